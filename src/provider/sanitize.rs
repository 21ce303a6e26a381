//! Provider-specific message-role filtering.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use tracing::debug;

use super::ApiFamily;
use crate::config::GuardConfig;
use crate::types::RoleTagged;

static BUILTIN_POLICY: LazyLock<RolePolicy> = LazyLock::new(RolePolicy::builtin);

/// Allowed roles for one API family.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyPolicy {
    pub family: ApiFamily,
    /// Lowercase identifiers that resolve a model-API id to this family.
    pub markers: Vec<String>,
    pub allowed_roles: BTreeSet<String>,
}

impl FamilyPolicy {
    pub fn new<I, S>(family: ApiFamily, allowed_roles: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            markers: family.default_markers(),
            family,
            allowed_roles: allowed_roles.into_iter().map(Into::into).collect(),
        }
    }

    pub fn allows(&self, role: &str) -> bool {
        self.allowed_roles.contains(role)
    }

    fn add_markers<I, S>(&mut self, markers: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for marker in markers {
            let marker = marker.as_ref().trim().to_ascii_lowercase();
            if !marker.is_empty() && !self.markers.contains(&marker) {
                self.markers.push(marker);
            }
        }
    }

    /// Best marker match for `api`: prefix matches rank above matches at a
    /// later `-` segment, then longer markers win.
    fn match_rank(&self, api: &str) -> Option<(bool, usize)> {
        self.markers
            .iter()
            .filter_map(|marker| {
                if api.starts_with(marker.as_str()) {
                    Some((true, marker.len()))
                } else if api
                    .match_indices(marker.as_str())
                    .any(|(idx, _)| api[..idx].ends_with('-'))
                {
                    Some((false, marker.len()))
                } else {
                    None
                }
            })
            .max()
    }
}

/// Table from API family to allowed roles.
///
/// APIs that resolve to no family are unrestricted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RolePolicy {
    families: Vec<FamilyPolicy>,
}

impl Default for RolePolicy {
    fn default() -> Self {
        Self::builtin()
    }
}

impl RolePolicy {
    /// Anthropic accepts only user/assistant; Google also accepts tool.
    pub fn builtin() -> Self {
        Self {
            families: vec![
                FamilyPolicy::new(ApiFamily::Anthropic, ["user", "assistant"]),
                FamilyPolicy::new(ApiFamily::Google, ["user", "assistant", "tool"]),
            ],
        }
    }

    /// A policy that never drops anything.
    pub fn unrestricted() -> Self {
        Self {
            families: Vec::new(),
        }
    }

    /// Built-in table with the configured overrides applied.
    pub fn from_config(config: &GuardConfig) -> Self {
        let mut policy = Self::builtin();
        for entry in &config.role_policies {
            policy.upsert(
                ApiFamily::parse(&entry.family),
                entry.markers.as_slice(),
                entry.allowed_roles.iter().cloned(),
            );
        }
        policy
    }

    /// Replace a family's allowed roles (adding markers), or add the family.
    pub fn with_family<I, S>(
        mut self,
        family: ApiFamily,
        markers: &[&str],
        allowed_roles: I,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.upsert(family, markers, allowed_roles);
        self
    }

    fn upsert<M, I, S>(&mut self, family: ApiFamily, markers: &[M], allowed_roles: I)
    where
        M: AsRef<str>,
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let allowed: BTreeSet<String> = allowed_roles.into_iter().map(Into::into).collect();
        match self.families.iter_mut().find(|p| p.family == family) {
            Some(existing) => {
                existing.allowed_roles = allowed;
                existing.add_markers(markers);
            }
            None => {
                let mut entry = FamilyPolicy {
                    markers: Vec::new(),
                    family,
                    allowed_roles: allowed,
                };
                if markers.is_empty() {
                    entry.add_markers(entry.family.default_markers());
                } else {
                    entry.add_markers(markers);
                }
                self.families.push(entry);
            }
        }
    }

    pub fn families(&self) -> &[FamilyPolicy] {
        &self.families
    }

    /// Resolve a model-API id to its family policy.
    ///
    /// A marker matches when it starts the id or starts a `-` separated
    /// segment of it (`vertex-gemini`), ignoring case. Prefix matches beat
    /// segment matches; among equals the longest marker wins.
    pub fn resolve(&self, model_api: Option<&str>) -> Option<&FamilyPolicy> {
        let api = model_api?.trim().to_ascii_lowercase();
        if api.is_empty() {
            return None;
        }
        let mut best: Option<((bool, usize), &FamilyPolicy)> = None;
        for policy in &self.families {
            if let Some(rank) = policy.match_rank(&api) {
                if best.map_or(true, |(best_rank, _)| rank > best_rank) {
                    best = Some((rank, policy));
                }
            }
        }
        best.map(|(_, policy)| policy)
    }

    /// Whether a message with `role` may be sent to `model_api`.
    pub fn allows(&self, model_api: Option<&str>, role: Option<&str>) -> bool {
        match (role, self.resolve(model_api)) {
            (Some(role), Some(policy)) => policy.allows(role),
            _ => true,
        }
    }

    /// Keep only messages whose role `model_api` supports, in order.
    pub fn sanitize<M>(&self, messages: &[M], model_api: Option<&str>) -> Vec<M>
    where
        M: RoleTagged + Clone,
    {
        let Some(policy) = self.resolve(model_api) else {
            return messages.to_vec();
        };
        messages
            .iter()
            .filter(|message| match message.role() {
                Some(role) if !policy.allows(role) => {
                    debug!(
                        role,
                        api = model_api.unwrap_or_default(),
                        family = %policy.family,
                        "dropping message with unsupported role"
                    );
                    false
                }
                _ => true,
            })
            .cloned()
            .collect()
    }
}

/// Filter `messages` with the built-in role policy.
pub fn sanitize_roles<M>(messages: &[M], model_api: Option<&str>) -> Vec<M>
where
    M: RoleTagged + Clone,
{
    BUILTIN_POLICY.sanitize(messages, model_api)
}
