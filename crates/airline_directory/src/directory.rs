//! Indexed airline lookup

use std::collections::HashMap;

use once_cell::sync::Lazy;

use crate::error::DirectoryError;
use crate::profile::{
    AirlineProfile, DocumentKind, FollowUpSchedule, SubmissionChannel,
};

/// Airline reference table with canonical-code and normalized-alias indexes
///
/// Both indexes are built once at construction; resolution is O(1) per query.
#[derive(Debug, Clone)]
pub struct AirlineDirectory {
    by_code: HashMap<String, AirlineProfile>,
    alias_index: HashMap<String, String>,
}

/// Folds case, whitespace, and punctuation so "British Airways", "british-airways"
/// and "BRITISHAIRWAYS" all resolve to the same entry.
fn normalize(query: &str) -> String {
    query
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

impl AirlineDirectory {
    /// Builds a directory from profiles, indexing codes, names, and aliases
    pub fn from_profiles(profiles: Vec<AirlineProfile>) -> Result<Self, DirectoryError> {
        let mut by_code = HashMap::with_capacity(profiles.len());
        let mut alias_index = HashMap::new();

        for profile in profiles {
            let code_key = normalize(&profile.code);
            if by_code.contains_key(&code_key) {
                return Err(DirectoryError::DuplicateCode(profile.code));
            }

            for alias in profile
                .aliases
                .iter()
                .map(String::as_str)
                .chain([profile.name.as_str()])
            {
                let alias_key = normalize(alias);
                if alias_key.is_empty() || alias_key == code_key {
                    continue;
                }
                if let Some(existing) = alias_index.get(&alias_key) {
                    if existing != &code_key {
                        return Err(DirectoryError::AmbiguousAlias(alias.to_string()));
                    }
                }
                alias_index.insert(alias_key, code_key.clone());
            }

            by_code.insert(code_key, profile);
        }

        Ok(Self {
            by_code,
            alias_index,
        })
    }

    /// Resolves an airline by canonical code, name, or alias
    pub fn resolve(&self, query: &str) -> Option<&AirlineProfile> {
        let key = normalize(query);
        self.by_code
            .get(&key)
            .or_else(|| self.alias_index.get(&key).and_then(|code| self.by_code.get(code)))
    }

    /// Like [`resolve`](Self::resolve), but missing airlines are an explicit
    /// error so filing-related transitions can surface "unsupported airline".
    pub fn require(&self, query: &str) -> Result<&AirlineProfile, DirectoryError> {
        self.resolve(query)
            .ok_or_else(|| DirectoryError::UnsupportedAirline(query.to_string()))
    }

    /// Number of airlines in the directory
    pub fn len(&self) -> usize {
        self.by_code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_code.is_empty()
    }
}

/// Built-in directory of supported airlines
pub fn builtin_directory() -> &'static AirlineDirectory {
    static DIRECTORY: Lazy<AirlineDirectory> = Lazy::new(|| {
        AirlineDirectory::from_profiles(builtin_profiles())
            .expect("builtin airline profiles are consistent")
    });
    &DIRECTORY
}

fn email(address: &str) -> SubmissionChannel {
    SubmissionChannel::Email {
        address: address.to_string(),
    }
}

fn web_form(url: &str) -> SubmissionChannel {
    SubmissionChannel::WebForm {
        url: url.to_string(),
    }
}

fn builtin_profiles() -> Vec<AirlineProfile> {
    vec![
        AirlineProfile {
            code: "LH".to_string(),
            name: "Lufthansa".to_string(),
            aliases: vec!["DLH".to_string(), "Deutsche Lufthansa".to_string()],
            channel: web_form("https://www.lufthansa.com/feedback"),
            required_documents: vec![DocumentKind::BookingConfirmation],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 28,
            follow_up: FollowUpSchedule::new(vec![14, 21, 30]),
        },
        AirlineProfile {
            code: "BA".to_string(),
            name: "British Airways".to_string(),
            aliases: vec!["BAW".to_string(), "Speedbird".to_string()],
            channel: web_form("https://www.britishairways.com/claims"),
            required_documents: vec![DocumentKind::BookingConfirmation],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 21,
            follow_up: FollowUpSchedule::new(vec![14, 28]),
        },
        AirlineProfile {
            code: "FR".to_string(),
            name: "Ryanair".to_string(),
            aliases: vec!["RYR".to_string()],
            channel: web_form("https://onlineform.ryanair.com/eu261"),
            required_documents: vec![],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 42,
            follow_up: FollowUpSchedule::new(vec![21, 30, 30]),
        },
        AirlineProfile {
            code: "U2".to_string(),
            name: "easyJet".to_string(),
            aliases: vec!["EZY".to_string(), "easy jet".to_string()],
            channel: email("customer.support@easyjet.com"),
            required_documents: vec![],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 28,
            follow_up: FollowUpSchedule::new(vec![14, 21]),
        },
        AirlineProfile {
            code: "AF".to_string(),
            name: "Air France".to_string(),
            aliases: vec!["AFR".to_string(), "airfrance".to_string()],
            channel: web_form("https://www.airfrance.com/claim"),
            required_documents: vec![DocumentKind::IdDocument],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 30,
            follow_up: FollowUpSchedule::new(vec![14, 21, 30]),
        },
        AirlineProfile {
            code: "AA".to_string(),
            name: "American Airlines".to_string(),
            aliases: vec!["AAL".to_string(), "American".to_string()],
            channel: email("customer.relations@aa.com"),
            required_documents: vec![],
            required_fields: vec![],
            expected_response_days: 14,
            follow_up: FollowUpSchedule::new(vec![14]),
        },
        AirlineProfile {
            code: "AC".to_string(),
            name: "Air Canada".to_string(),
            aliases: vec!["ACA".to_string()],
            channel: web_form("https://accc-prod.microsoftcrmportals.com/appr"),
            required_documents: vec![DocumentKind::BookingConfirmation],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 30,
            follow_up: FollowUpSchedule::new(vec![30]),
        },
        AirlineProfile {
            code: "LX".to_string(),
            name: "Swiss International Air Lines".to_string(),
            aliases: vec!["SWR".to_string(), "Swiss".to_string()],
            channel: web_form("https://www.swiss.com/feedback"),
            required_documents: vec![DocumentKind::BookingConfirmation],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 28,
            follow_up: FollowUpSchedule::new(vec![14, 30]),
        },
        AirlineProfile {
            code: "DY".to_string(),
            name: "Norwegian Air Shuttle".to_string(),
            aliases: vec!["NAX".to_string(), "Norwegian".to_string()],
            channel: email("claims@norwegian.com"),
            required_documents: vec![],
            required_fields: vec!["booking_reference".to_string()],
            expected_response_days: 21,
            follow_up: FollowUpSchedule::new(vec![14, 21]),
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_by_code_and_alias() {
        let directory = builtin_directory();

        assert_eq!(directory.resolve("LH").unwrap().name, "Lufthansa");
        assert_eq!(directory.resolve("lufthansa").unwrap().code, "LH");
        assert_eq!(directory.resolve("Deutsche  Lufthansa").unwrap().code, "LH");
        assert_eq!(directory.resolve("easy-jet").unwrap().code, "U2");
    }

    #[test]
    fn test_unsupported_airline() {
        let directory = builtin_directory();
        let err = directory.require("Totally Fictional Air").unwrap_err();
        assert!(matches!(err, DirectoryError::UnsupportedAirline(_)));
    }

    #[test]
    fn test_duplicate_code_rejected() {
        let profile = builtin_profiles().remove(0);
        let mut duplicate = profile.clone();
        duplicate.name = "Lufthansa Again".to_string();
        duplicate.aliases = vec![];

        let err = AirlineDirectory::from_profiles(vec![profile, duplicate]).unwrap_err();
        assert!(matches!(err, DirectoryError::DuplicateCode(_)));
    }
}
