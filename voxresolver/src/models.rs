//! Structures de données du résolveur
//!
//! `RawTrack` est la forme brute renvoyée par l'extracteur amont ;
//! `TrackCandidate` une résolution sans demandeur (résultat de recherche
//! ou entrée de cache) ; `Track` la piste complète prête à entrer dans
//! une file de lecture.

use crate::error::{ResolverError, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Entrée brute telle que décodée depuis la sortie JSON de l'extracteur
#[derive(Debug, Clone, Deserialize)]
pub struct RawTrack {
    /// URL de la page source
    #[serde(default)]
    pub webpage_url: Option<String>,
    /// URL du flux audio directement lisible
    #[serde(default)]
    pub url: Option<String>,
    /// Titre annoncé
    #[serde(default)]
    pub title: Option<String>,
    /// Durée annoncée en secondes (souvent absente pour les directs)
    #[serde(default)]
    pub duration: Option<f64>,
    /// Chaîne/compte ayant mis la piste en ligne
    #[serde(default)]
    pub uploader: Option<String>,
}

impl RawTrack {
    /// Convertit l'entrée brute en candidat exploitable.
    ///
    /// Le flux audio est indispensable ; tout le reste dégrade vers des
    /// valeurs neutres, comme le fait l'extracteur lui-même.
    pub fn into_candidate(self) -> Result<TrackCandidate> {
        let stream_url = self
            .url
            .ok_or(ResolverError::MissingField("url"))?;
        let source_url = self.webpage_url.unwrap_or_else(|| stream_url.clone());
        Ok(TrackCandidate {
            source_url,
            stream_url,
            title: self.title.unwrap_or_else(|| "Unknown Title".to_string()),
            duration_secs: self.duration.map(|d| d.max(0.0) as u64),
            uploader: self.uploader,
        })
    }
}

/// Résolution partielle : métadonnées sans demandeur.
///
/// C'est la forme stockée dans le cache du résolveur et proposée dans
/// les listes de résultats de recherche. La validité de `stream_url`
/// n'est pas garantie dans la durée : un candidat listé puis choisi
/// plus tard doit être revalidé avant d'entrer dans une file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackCandidate {
    /// URL de la page source
    pub source_url: String,
    /// URL du flux audio
    pub stream_url: String,
    /// Titre
    pub title: String,
    /// Durée annoncée en secondes
    pub duration_secs: Option<u64>,
    /// Chaîne/compte d'origine
    pub uploader: Option<String>,
}

impl TrackCandidate {
    /// Promeut le candidat en piste attribuée à un demandeur
    pub fn into_track(self, requester: &str) -> Track {
        Track {
            source_url: self.source_url,
            stream_url: self.stream_url,
            title: self.title,
            duration_secs: self.duration_secs,
            uploader: self.uploader,
            requester: requester.to_string(),
            started_at: None,
        }
    }
}

/// Une piste résolue, prête à être mise en file puis lue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    /// URL de la page source
    pub source_url: String,
    /// URL du flux audio passée au transport
    pub stream_url: String,
    /// Titre
    pub title: String,
    /// Durée annoncée en secondes, si l'amont la connaît
    pub duration_secs: Option<u64>,
    /// Chaîne/compte d'origine
    pub uploader: Option<String>,
    /// Nom d'affichage du demandeur
    pub requester: String,
    /// Instant de début de lecture, posé quand le transport démarre
    pub started_at: Option<DateTime<Utc>>,
}

impl Track {
    /// Marque le début de lecture (maintenant)
    pub fn mark_started(&mut self) {
        self.started_at = Some(Utc::now());
    }

    /// Secondes écoulées depuis le début de lecture, si connu
    pub fn elapsed_secs(&self) -> Option<f64> {
        self.started_at
            .map(|t| (Utc::now() - t).num_milliseconds() as f64 / 1000.0)
    }
}
