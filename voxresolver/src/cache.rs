//! Cache des résolutions, à durée de vie du processus
//!
//! Clé : la chaîne de requête BRUTE (URL ou mots-clés), pas l'identité
//! canonique de la piste. Deux requêtes différentes qui résolvent vers
//! le même média occupent donc deux entrées distinctes — compromis
//! assumé : la latence prime sur la fraîcheur et sur la déduplication.
//!
//! Les entrées ne sont jamais invalidées ni évincées. Le cache est
//! partagé entre toutes les sessions ; une course d'insertion sur une
//! même clé est bénigne (les deux écritures portent la même valeur,
//! la dernière gagne).

use crate::models::TrackCandidate;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Cache mémoire requête → résolution
#[derive(Debug, Default)]
pub struct ResolverCache {
    entries: RwLock<HashMap<String, TrackCandidate>>,
}

impl ResolverCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Récupère la résolution mémorisée pour une requête
    pub async fn get(&self, query: &str) -> Option<TrackCandidate> {
        self.entries.read().await.get(query).cloned()
    }

    /// Mémorise une résolution réussie. Les échecs ne passent jamais
    /// par ici : seul un succès peuple le cache.
    pub async fn put(&self, query: &str, candidate: TrackCandidate) {
        self.entries
            .write()
            .await
            .insert(query.to_string(), candidate);
    }

    /// Nombre d'entrées mémorisées
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
