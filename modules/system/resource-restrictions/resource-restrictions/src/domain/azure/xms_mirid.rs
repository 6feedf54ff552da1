//! Parser for the `xms_mirid` token claim.
//!
//! ```text
//! /subscriptions/{sub}/resourcegroups/{group}/providers/{namespace}/{type}/{name}[/{type}/{name}...]
//! ```

use resource_restrictions_sdk::ResourceRestrictionsError;

const SUBSCRIPTIONS: &str = "subscriptions";
const RESOURCE_GROUPS: &str = "resourcegroups";
const PROVIDERS: &str = "providers";

/// Provider namespace that marks a user-assigned managed identity.
pub const MANAGED_IDENTITY_PROVIDER: &str = "Microsoft.ManagedIdentity";

/// A parsed `xms_mirid` claim, borrowing from the claim string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmsMirid<'a> {
    subscription_id: &'a str,
    resource_group: &'a str,
    providers: Vec<&'a str>,
}

impl<'a> XmsMirid<'a> {
    /// # Errors
    ///
    /// - `XmsMiridParseError` if the claim is not an absolute path, has an
    ///   empty segment, or lacks one of the section keywords
    /// - `MissingProviderFieldsInXmsMirid` if the providers section is not a
    ///   namespace followed by type/name pairs
    pub fn parse(claim: &'a str) -> Result<Self, ResourceRestrictionsError> {
        let parse_error = |reason: &str| ResourceRestrictionsError::XmsMiridParseError {
            claim: claim.to_owned(),
            reason: reason.to_owned(),
        };

        let path = claim
            .strip_prefix('/')
            .ok_or_else(|| parse_error("expected a path starting with '/'"))?;
        let segments: Vec<&str> = path.split('/').collect();
        if segments.iter().any(|segment| segment.is_empty()) {
            return Err(parse_error("empty path segment"));
        }

        let mut segments = segments.into_iter();
        let subscription_id = section(&mut segments, SUBSCRIPTIONS)
            .ok_or_else(|| parse_error("expected '/subscriptions/{id}'"))?;
        let resource_group = section(&mut segments, RESOURCE_GROUPS)
            .ok_or_else(|| parse_error("expected '/resourcegroups/{name}'"))?;

        if !segments
            .next()
            .is_some_and(|keyword| keyword.eq_ignore_ascii_case(PROVIDERS))
        {
            return Err(parse_error("expected '/providers'"));
        }
        let providers: Vec<&str> = segments.collect();
        // namespace followed by type/name pairs
        if providers.len() < 3 || providers.len().is_multiple_of(2) {
            return Err(ResourceRestrictionsError::MissingProviderFieldsInXmsMirid(
                claim.to_owned(),
            ));
        }

        Ok(Self {
            subscription_id,
            resource_group,
            providers,
        })
    }

    #[must_use]
    pub fn subscription_id(&self) -> &'a str {
        self.subscription_id
    }

    #[must_use]
    pub fn resource_group(&self) -> &'a str {
        self.resource_group
    }

    /// Provider segments in claim order, starting with the namespace.
    #[must_use]
    pub fn providers(&self) -> &[&'a str] {
        &self.providers
    }

    /// Whether the claim was issued for a user-assigned managed identity.
    #[must_use]
    pub fn is_user_assigned(&self) -> bool {
        self.providers
            .iter()
            .any(|segment| segment.eq_ignore_ascii_case(MANAGED_IDENTITY_PROVIDER))
    }

    /// Name of the issuing resource, the last provider segment.
    #[must_use]
    pub fn resource_name(&self) -> Option<&'a str> {
        self.providers.last().copied()
    }
}

fn section<'a>(segments: &mut impl Iterator<Item = &'a str>, keyword: &str) -> Option<&'a str> {
    segments
        .next()
        .filter(|segment| segment.eq_ignore_ascii_case(keyword))?;
    segments.next()
}
