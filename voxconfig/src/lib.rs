//! # Configuration de VoxQueue
//!
//! Ce module fournit la gestion de configuration de VoxQueue :
//! - chargement depuis un fichier YAML utilisateur
//! - fusion avec la configuration par défaut intégrée
//! - redéfinition par variables d'environnement dédiées
//! - getters typés avec valeurs par défaut
//! - accès singleton thread-safe
//!
//! ## Utilisation
//!
//! ```no_run
//! use voxconfig::get_config;
//!
//! let config = get_config();
//! let ratio = config.normal_end_ratio();
//! let cookies = config.cookie_file();
//! ```

use anyhow::{Context, Result};
use lazy_static::lazy_static;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use std::{env, fs};
use tracing::{info, warn};

/// Configuration par défaut intégrée
const DEFAULT_CONFIG: &str = include_str!("voxqueue.yaml");

lazy_static! {
    static ref CONFIG: Arc<Config> = Arc::new(Config::load());
}

/// Fichier de configuration explicite
const ENV_CONFIG_FILE: &str = "VOXQUEUE_CONFIG";
/// Fichier de cookies transmis à l'extracteur
const ENV_COOKIE_FILE: &str = "VOXQUEUE_COOKIES";
/// Bibliothèque opus alternative (exposée à la couche de bootstrap)
const ENV_OPUS_LIB: &str = "VOXQUEUE_OPUS_LIB";

const DEFAULT_NORMAL_END_RATIO: f64 = 0.8;
const DEFAULT_SETTLE_DELAY_MS: u64 = 500;
const DEFAULT_SEARCH_WIDTH: usize = 5;

/// Gestionnaire de configuration de VoxQueue
///
/// Les valeurs absentes du fichier utilisateur retombent sur la
/// configuration par défaut intégrée, puis sur les constantes du module.
/// Les variables d'environnement dédiées priment sur le fichier.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    cookie_file: Option<PathBuf>,
    codec_lib_override: Option<PathBuf>,
    normal_end_ratio: Option<f64>,
    completion_settle_delay_ms: Option<u64>,
    search_width: Option<usize>,
}

impl Config {
    /// Charge la configuration en essayant, dans l'ordre :
    /// le fichier pointé par `VOXQUEUE_CONFIG`, puis
    /// `<config_dir>/voxqueue/voxqueue.yaml`, puis la configuration
    /// par défaut intégrée. Une erreur de lecture ou de parsing n'est
    /// jamais fatale : elle est journalisée et la valeur par défaut
    /// est utilisée.
    pub fn load() -> Self {
        for path in Self::candidate_paths() {
            if !path.is_file() {
                continue;
            }
            match Self::load_from(&path) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    return config;
                }
                Err(e) => {
                    warn!("Ignoring configuration {}: {:#}", path.display(), e);
                }
            }
        }
        Self::builtin()
    }

    /// Charge la configuration depuis un fichier YAML précis
    pub fn load_from(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("cannot read {}", path.display()))?;
        serde_yaml::from_str(&text)
            .with_context(|| format!("cannot parse {}", path.display()))
    }

    /// Configuration par défaut intégrée
    pub fn builtin() -> Self {
        // Le YAML intégré est validé par les tests du module.
        serde_yaml::from_str(DEFAULT_CONFIG).unwrap_or_default()
    }

    fn candidate_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();
        if let Ok(explicit) = env::var(ENV_CONFIG_FILE) {
            paths.push(PathBuf::from(explicit));
        }
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("voxqueue").join("voxqueue.yaml"));
        }
        paths
    }

    // ============ Getters typés ============

    /// Chemin du fichier de cookies pour l'extracteur amont.
    ///
    /// `VOXQUEUE_COOKIES` prime sur le fichier de configuration. Aucune
    /// vérification d'existence ici : la présence est contrôlée (et
    /// journalisée) par [`Config::health_report`], et l'extracteur
    /// fonctionne sans cookies.
    pub fn cookie_file(&self) -> Option<PathBuf> {
        env::var(ENV_COOKIE_FILE)
            .map(PathBuf::from)
            .ok()
            .or_else(|| self.cookie_file.clone())
    }

    /// Chemin d'une bibliothèque de codec audio alternative.
    ///
    /// Exposé pour la couche de bootstrap qui charge la bibliothèque ;
    /// le coeur ne fait que transporter la valeur.
    pub fn codec_lib_override(&self) -> Option<PathBuf> {
        env::var(ENV_OPUS_LIB)
            .map(PathBuf::from)
            .ok()
            .or_else(|| self.codec_lib_override.clone())
    }

    /// Seuil du ratio écouté/annoncé pour classer une fin de lecture
    /// comme normale. Heuristique, pas une garantie : les métadonnées
    /// de durée amont peuvent manquer ou être fausses.
    pub fn normal_end_ratio(&self) -> f64 {
        self.normal_end_ratio.unwrap_or(DEFAULT_NORMAL_END_RATIO)
    }

    /// Délai de stabilisation entre un arrêt du transport et
    /// l'évaluation de la fin de lecture.
    pub fn completion_settle_delay(&self) -> Duration {
        Duration::from_millis(
            self.completion_settle_delay_ms
                .unwrap_or(DEFAULT_SETTLE_DELAY_MS),
        )
    }

    /// Nombre de candidats proposés par une recherche
    pub fn search_width(&self) -> usize {
        self.search_width.unwrap_or(DEFAULT_SEARCH_WIDTH)
    }

    // ============ Diagnostic de démarrage ============

    /// Construit le rapport de santé du démarrage.
    ///
    /// Purement informatif : rien ici n'est une erreur. Le coeur
    /// fonctionne sans ffmpeg (c'est le transport qui en a besoin) et
    /// sans cookies (l'extracteur dégrade seulement sa disponibilité).
    pub fn health_report(&self) -> HealthReport {
        let cookie_file = self.cookie_file();
        let cookie_file_present = cookie_file
            .as_deref()
            .map(Path::is_file)
            .unwrap_or(false);
        HealthReport {
            ffmpeg: find_in_path("ffmpeg"),
            cookie_file,
            cookie_file_present,
            codec_lib_override: self.codec_lib_override(),
        }
    }
}

/// Accès au singleton de configuration
pub fn get_config() -> Arc<Config> {
    CONFIG.clone()
}

/// Diagnostics non bloquants collectés au démarrage
#[derive(Debug, Clone)]
pub struct HealthReport {
    /// Emplacement de ffmpeg dans le PATH, si présent
    pub ffmpeg: Option<PathBuf>,
    /// Fichier de cookies configuré
    pub cookie_file: Option<PathBuf>,
    /// Le fichier de cookies configuré existe-t-il réellement
    pub cookie_file_present: bool,
    /// Bibliothèque de codec alternative configurée
    pub codec_lib_override: Option<PathBuf>,
}

impl HealthReport {
    /// Journalise le rapport, en avertissant sur les configurations
    /// probablement involontaires (cookies configurés mais absents).
    pub fn log(&self) {
        match &self.ffmpeg {
            Some(path) => info!("ffmpeg found in PATH: {}", path.display()),
            None => warn!("ffmpeg not found in PATH; the audio transport will not work"),
        }
        match (&self.cookie_file, self.cookie_file_present) {
            (Some(path), true) => info!("Using extractor cookies from {}", path.display()),
            (Some(path), false) => {
                warn!(
                    "Cookie file {} is configured but does not exist; lookups run without cookies",
                    path.display()
                )
            }
            (None, _) => info!("No extractor cookies configured"),
        }
        if let Some(lib) = &self.codec_lib_override {
            info!("Codec library override: {}", lib.display());
        }
    }
}

/// Cherche un exécutable dans le PATH
fn find_in_path(program: &str) -> Option<PathBuf> {
    let path = env::var_os("PATH")?;
    env::split_paths(&path)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn builtin_config_parses() {
        let config = Config::builtin();
        assert_eq!(config.normal_end_ratio(), 0.8);
        assert_eq!(config.completion_settle_delay(), Duration::from_millis(500));
        assert_eq!(config.search_width(), 5);
    }

    #[test]
    fn empty_config_falls_back_to_defaults() {
        let config = Config::default();
        assert_eq!(config.normal_end_ratio(), DEFAULT_NORMAL_END_RATIO);
        assert_eq!(config.search_width(), DEFAULT_SEARCH_WIDTH);
        assert_eq!(
            config.completion_settle_delay(),
            Duration::from_millis(DEFAULT_SETTLE_DELAY_MS)
        );
    }

    #[test]
    fn load_from_reads_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "normal_end_ratio: 0.9\nsearch_width: 3\ncookie_file: /tmp/jar.txt"
        )
        .unwrap();

        let config = Config::load_from(file.path()).unwrap();
        assert_eq!(config.normal_end_ratio(), 0.9);
        assert_eq!(config.search_width(), 3);
        // L'environnement de test ne définit pas VOXQUEUE_COOKIES.
        if env::var(ENV_COOKIE_FILE).is_err() {
            assert_eq!(config.cookie_file(), Some(PathBuf::from("/tmp/jar.txt")));
        }
    }

    #[test]
    fn load_from_rejects_bad_yaml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "normal_end_ratio: [not a number").unwrap();
        assert!(Config::load_from(file.path()).is_err());
    }

    #[test]
    fn health_report_flags_missing_cookie_file() {
        let config = Config {
            cookie_file: Some(PathBuf::from("/nonexistent/jar.txt")),
            ..Config::default()
        };
        if env::var(ENV_COOKIE_FILE).is_err() {
            let report = config.health_report();
            assert!(!report.cookie_file_present);
            assert!(report.cookie_file.is_some());
        }
    }
}
