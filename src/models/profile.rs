use serde::{Deserialize, Serialize};

/// Stated taste of a profile
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProfilePreferences {
    /// Preferred genres, strongest first
    #[serde(default)]
    pub genres: Vec<String>,
}

/// A viewer profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Profile {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub preferences: ProfilePreferences,
}

impl Profile {
    pub fn new(id: impl Into<String>, genres: &[&str]) -> Self {
        Self {
            id: id.into(),
            name: None,
            preferences: ProfilePreferences {
                genres: genres.iter().map(|g| g.to_string()).collect(),
            },
        }
    }

    pub fn prefers(&self, genre: &str) -> bool {
        self.preferences.genres.iter().any(|g| g == genre)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_document() {
        let profile: Profile = serde_json::from_str(
            r#"{"id": "1", "name": "Action Fan", "preferences": {"genres": ["action", "thriller"]}}"#,
        )
        .unwrap();

        assert_eq!(profile.id, "1");
        assert_eq!(profile.name.as_deref(), Some("Action Fan"));
        assert_eq!(profile.preferences.genres, vec!["action", "thriller"]);
        assert!(profile.prefers("thriller"));
        assert!(!profile.prefers("comedy"));
    }

    #[test]
    fn test_profile_without_preferences() {
        let profile: Profile = serde_json::from_str(r#"{"id": "2"}"#).unwrap();
        assert!(profile.preferences.genres.is_empty());
    }
}
