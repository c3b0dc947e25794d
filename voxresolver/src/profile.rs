//! Profils d'accès à l'extracteur amont
//!
//! La disponibilité amont dépend de l'identité de client présentée :
//! une extraction refusée sous un profil peut réussir sous un autre.
//! Le résolveur essaie donc la même requête logique sous une liste
//! ordonnée de profils distincts et s'arrête au premier succès.

use serde::{Deserialize, Serialize};

/// Une identité de client présentée à l'extracteur amont
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessProfile {
    /// Nom court du profil, utilisé dans les logs et les erreurs
    pub name: String,
    /// Identité de lecteur transmise à l'extracteur
    /// (`--extractor-args youtube:player_client=...`)
    pub player_client: String,
    /// User-Agent HTTP à présenter, si le profil en impose un
    pub user_agent: Option<String>,
}

impl AccessProfile {
    pub fn new(name: &str, player_client: &str, user_agent: Option<&str>) -> Self {
        Self {
            name: name.to_string(),
            player_client: player_client.to_string(),
            user_agent: user_agent.map(String::from),
        }
    }
}

/// Liste ordonnée des profils par défaut.
///
/// L'ordre compte : du profil le plus fiable au plus contraignant.
pub fn default_profiles() -> Vec<AccessProfile> {
    vec![
        AccessProfile::new("android", "android", None),
        AccessProfile::new(
            "web",
            "web",
            Some(
                "Mozilla/5.0 (Windows NT 10.0; Win64; x64; rv:109.0) \
                 Gecko/20100101 Firefox/115.0",
            ),
        ),
        AccessProfile::new("tv-embedded", "tv_embedded", None),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_profiles_are_ordered_and_distinct() {
        let profiles = default_profiles();
        assert!(profiles.len() >= 2);
        assert_eq!(profiles[0].name, "android");
        let mut names: Vec<_> = profiles.iter().map(|p| p.name.clone()).collect();
        names.dedup();
        assert_eq!(names.len(), profiles.len());
    }
}
