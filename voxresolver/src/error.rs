//! Gestion des erreurs pour le résolveur de pistes

use thiserror::Error;

/// Type Result personnalisé pour voxresolver
pub type Result<T> = std::result::Result<T, ResolverError>;

/// Erreurs possibles lors de la résolution d'une requête
///
/// Toutes les variantes portent une cause lisible par un humain ; pour
/// l'appelant elles signifient uniformément « la résolution a échoué »,
/// sans sous-typage plus fin à interpréter.
#[derive(Error, Debug)]
pub enum ResolverError {
    /// L'exécutable extracteur n'a pas pu être lancé
    #[error("failed to launch the extractor: {0}")]
    Spawn(#[from] std::io::Error),

    /// L'extracteur a refusé l'extraction (blocage amont, vidéo
    /// indisponible, vérification anti-bot, etc.)
    #[error("extraction refused: {0}")]
    Extraction(String),

    /// La sortie de l'extracteur n'a pas pu être décodée
    #[error("unreadable extractor payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// Champ indispensable absent de la sortie de l'extracteur
    #[error("extractor payload missing field '{0}'")]
    MissingField(&'static str),

    /// Aucun résultat pour la requête
    #[error("no result for query: {0}")]
    NoResult(String),

    /// Tous les profils d'accès ont échoué ; l'erreur du dernier
    /// profil est conservée comme cause.
    #[error("all access profiles failed; last profile '{profile}': {source}")]
    Exhausted {
        profile: String,
        #[source]
        source: Box<ResolverError>,
    },
}

impl ResolverError {
    /// Vrai si l'erreur est le résultat de l'épuisement des profils
    pub fn is_exhausted(&self) -> bool {
        matches!(self, ResolverError::Exhausted { .. })
    }
}
