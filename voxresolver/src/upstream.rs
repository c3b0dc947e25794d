//! Frontière du service de recherche amont
//!
//! Le résolveur ne parle jamais directement à l'extracteur : il passe
//! par le trait [`LookupBackend`], ce qui permet de substituer l'amont
//! dans les tests et d'isoler la politique de fallback de la mécanique
//! d'invocation.

use crate::error::Result;
use crate::models::RawTrack;
use crate::profile::AccessProfile;

/// Classification d'une requête utilisateur
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// Lien direct vers un média : résolution simple, pas de classement
    DirectLink,
    /// Mots-clés : recherche amont, résultats classés
    Search,
}

/// Une requête amont complète : quoi chercher, comment, sous quelle
/// identité.
#[derive(Debug, Clone)]
pub struct LookupRequest {
    /// Requête brute (URL ou mots-clés)
    pub query: String,
    /// Classification de la requête
    pub kind: QueryKind,
    /// Profil d'accès à présenter à l'amont
    pub profile: AccessProfile,
}

/// Service de recherche amont.
///
/// Une implémentation doit borner chaque tentative (timeouts/retries
/// imposés à l'amont) : la politique de fallback du résolveur suppose
/// que `lookup_*` finit toujours par rendre la main.
#[async_trait::async_trait]
pub trait LookupBackend: Send + Sync {
    /// Résout la requête en un seul résultat (le premier classé pour
    /// une recherche, l'unique résultat pour un lien direct).
    async fn lookup_one(&self, request: &LookupRequest) -> Result<RawTrack>;

    /// Résout la requête en ses `n` premiers résultats classés.
    async fn lookup_top(&self, request: &LookupRequest, n: usize) -> Result<Vec<RawTrack>>;
}
