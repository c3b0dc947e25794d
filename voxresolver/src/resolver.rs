//! Résolveur principal : requête utilisateur → piste lisible
//!
//! Enchaîne le contrôle de cache, la classification lien-direct /
//! recherche, puis la même requête logique sous la liste ordonnée de
//! profils d'accès (premier succès, ou l'échec du dernier profil avec
//! sa cause préservée).

use crate::cache::ResolverCache;
use crate::error::{ResolverError, Result};
use crate::models::{Track, TrackCandidate};
use crate::profile::{AccessProfile, default_profiles};
use crate::upstream::{LookupBackend, LookupRequest, QueryKind};
use lazy_static::lazy_static;
use regex::Regex;
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, warn};

lazy_static! {
    /// Lien direct vers un média connu de l'extracteur
    static ref DIRECT_LINK_REGEX: Regex = Regex::new(
        r"(?i)^(https?://)?(www\.)?(youtube\.com|youtu\.be)/.+"
    )
    .expect("direct link pattern is valid");
}

/// Résolveur de pistes avec cache et fallback de profils
pub struct TrackResolver {
    /// Service de recherche amont
    backend: Arc<dyn LookupBackend>,
    /// Cache des résolutions réussies
    cache: ResolverCache,
    /// Profils d'accès, essayés dans l'ordre
    profiles: Vec<AccessProfile>,
}

impl TrackResolver {
    /// Crée un résolveur avec la liste de profils par défaut
    pub fn new(backend: Arc<dyn LookupBackend>) -> Self {
        Self::with_profiles(backend, default_profiles())
    }

    /// Crée un résolveur avec une liste de profils explicite.
    /// Une liste vide retombe sur les profils par défaut.
    pub fn with_profiles(backend: Arc<dyn LookupBackend>, profiles: Vec<AccessProfile>) -> Self {
        let profiles = if profiles.is_empty() {
            default_profiles()
        } else {
            profiles
        };
        Self {
            backend,
            cache: ResolverCache::new(),
            profiles,
        }
    }

    /// Référence au cache des résolutions
    pub fn cache(&self) -> &ResolverCache {
        &self.cache
    }

    /// Profils d'accès configurés, dans l'ordre d'essai
    pub fn profiles(&self) -> &[AccessProfile] {
        &self.profiles
    }

    /// Résout une requête (URL ou mots-clés) en une piste attribuée au
    /// demandeur. Le cache est consulté avant tout appel amont ; seuls
    /// les succès le peuplent.
    pub async fn resolve(&self, query: &str, requester: &str) -> Result<Track> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolverError::NoResult("empty query".to_string()));
        }

        if let Some(hit) = self.cache.get(query).await {
            debug!(query, "resolver cache hit");
            return Ok(hit.into_track(requester));
        }

        let kind = classify(query);
        let backend = Arc::clone(&self.backend);
        let raw = self
            .try_profiles(query, kind, move |request| {
                let backend = Arc::clone(&backend);
                async move { backend.lookup_one(&request).await }
            })
            .await?;

        let candidate = raw.into_candidate()?;
        self.cache.put(query, candidate.clone()).await;
        Ok(candidate.into_track(requester))
    }

    /// Résout une recherche en ses `n` premiers candidats classés.
    ///
    /// Pas de cache ici : les URLs de flux listées se périment entre le
    /// listage et la sélection, et la sélection revalide de toute façon.
    pub async fn resolve_top(&self, query: &str, n: usize) -> Result<Vec<TrackCandidate>> {
        let query = query.trim();
        if query.is_empty() {
            return Err(ResolverError::NoResult("empty query".to_string()));
        }

        let backend = Arc::clone(&self.backend);
        let raw = self
            .try_profiles(query, QueryKind::Search, move |request| {
                let backend = Arc::clone(&backend);
                async move { backend.lookup_top(&request, n).await }
            })
            .await?;

        raw.into_iter()
            .take(n)
            .map(|entry| entry.into_candidate())
            .collect()
    }

    /// Revalide un candidat choisi dans une liste de résultats avant sa
    /// mise en file : l'URL de flux listée peut être périmée ou bloquée.
    pub async fn revalidate(&self, candidate: &TrackCandidate, requester: &str) -> Result<Track> {
        self.resolve(&candidate.source_url, requester).await
    }

    /// Essaie `attempt` sous chaque profil dans l'ordre. Premier succès
    /// gagnant ; si tous échouent, l'erreur du dernier profil est rendue
    /// avec sa cause préservée — jamais avalée en silence.
    async fn try_profiles<T, F, Fut>(&self, query: &str, kind: QueryKind, mut attempt: F) -> Result<T>
    where
        F: FnMut(LookupRequest) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let mut last: Option<(String, ResolverError)> = None;

        for profile in &self.profiles {
            let request = LookupRequest {
                query: query.to_string(),
                kind,
                profile: profile.clone(),
            };
            match attempt(request).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    warn!(
                        profile = profile.name.as_str(),
                        query,
                        "lookup failed under profile: {e}"
                    );
                    last = Some((profile.name.clone(), e));
                }
            }
        }

        match last {
            Some((profile, source)) => Err(ResolverError::Exhausted {
                profile,
                source: Box::new(source),
            }),
            // Le constructeur garantit une liste non vide.
            None => Err(ResolverError::NoResult(query.to_string())),
        }
    }
}

/// Classe une requête : lien direct ou recherche par mots-clés
fn classify(query: &str) -> QueryKind {
    if DIRECT_LINK_REGEX.is_match(query) {
        QueryKind::DirectLink
    } else {
        QueryKind::Search
    }
}
