//! Implémentation de production de [`LookupBackend`]
//!
//! Pilote l'exécutable `yt-dlp` en sous-processus : une invocation par
//! tentative, sortie JSON (`-J`) décodée avec `serde_json`. Chaque
//! tentative est bornée par les options de retry transmises à
//! l'extracteur ; c'est ce qui permet au résolveur d'enchaîner les
//! profils sans boucle infinie.

use crate::error::{ResolverError, Result};
use crate::models::RawTrack;
use crate::upstream::{LookupBackend, LookupRequest, QueryKind};
use serde::Deserialize;
use std::ffi::OsString;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::Command;
use tracing::{debug, warn};

/// Nom de l'exécutable extracteur par défaut
const DEFAULT_PROGRAM: &str = "yt-dlp";

/// Longueur maximale de stderr conservée dans une cause d'erreur
const STDERR_TAIL: usize = 400;

/// Borne dure d'une tentative, au-delà des retries internes de
/// l'extracteur. La politique de fallback du résolveur exige que
/// chaque profil finisse par rendre la main.
const ATTEMPT_TIMEOUT: Duration = Duration::from_secs(60);

/// Backend de production pilotant `yt-dlp`
pub struct YtDlpBackend {
    /// Exécutable à lancer (surchargé dans les environnements de test)
    program: PathBuf,
    /// Fichier de cookies transmis à l'extracteur, si configuré
    cookie_file: Option<PathBuf>,
}

/// Enveloppe de la sortie d'une recherche (`ytsearchN:`)
#[derive(Debug, Deserialize)]
struct SearchPayload {
    #[serde(default)]
    entries: Vec<RawTrack>,
}

impl YtDlpBackend {
    /// Crée un backend avec un fichier de cookies explicite
    pub fn new(cookie_file: Option<PathBuf>) -> Self {
        Self {
            program: PathBuf::from(DEFAULT_PROGRAM),
            cookie_file,
        }
    }

    /// Crée un backend en utilisant la configuration de voxconfig
    pub fn from_config() -> Self {
        let config = voxconfig::get_config();
        let cookie_file = config.cookie_file().filter(|path| {
            let present = path.is_file();
            if !present {
                warn!(
                    "Configured cookie file {} does not exist; running without cookies",
                    path.display()
                );
            }
            present
        });
        Self::new(cookie_file)
    }

    /// Remplace l'exécutable invoqué (tests, chemins non standard)
    pub fn with_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.program = program.into();
        self
    }

    /// Construit la ligne d'arguments d'une invocation.
    ///
    /// Options fixes : JSON seul, pas de playlist, pas de
    /// téléchargement, contournement géographique, retries bornés.
    /// Le profil ajoute l'identité de lecteur et l'éventuel User-Agent.
    fn build_args(&self, request: &LookupRequest, n: Option<usize>) -> Vec<OsString> {
        let mut args: Vec<OsString> = vec![
            "-J".into(),
            "--no-playlist".into(),
            "--skip-download".into(),
            "--geo-bypass".into(),
            "--retries".into(),
            "3".into(),
            "--fragment-retries".into(),
            "3".into(),
            "-f".into(),
            "bestaudio[ext=m4a]/bestaudio/best".into(),
        ];

        args.push("--extractor-args".into());
        args.push(format!("youtube:player_client={}", request.profile.player_client).into());

        if let Some(ua) = &request.profile.user_agent {
            args.push("--user-agent".into());
            args.push(ua.into());
        }

        if let Some(cookies) = &self.cookie_file {
            args.push("--cookies".into());
            args.push(cookies.into());
        }

        let target = match (request.kind, n) {
            (QueryKind::DirectLink, _) => request.query.clone(),
            (QueryKind::Search, Some(n)) => format!("ytsearch{}:{}", n, request.query),
            (QueryKind::Search, None) => format!("ytsearch1:{}", request.query),
        };
        args.push("--".into());
        args.push(target.into());
        args
    }

    /// Lance une invocation et rend la sortie JSON décodée
    async fn run(&self, request: &LookupRequest, n: Option<usize>) -> Result<Vec<RawTrack>> {
        let args = self.build_args(request, n);
        debug!(
            profile = request.profile.name.as_str(),
            query = request.query.as_str(),
            "invoking extractor"
        );

        let invocation = Command::new(&self.program)
            .args(&args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();
        let output = tokio::time::timeout(ATTEMPT_TIMEOUT, invocation)
            .await
            .map_err(|_| {
                ResolverError::Extraction(format!(
                    "extractor timed out after {}s",
                    ATTEMPT_TIMEOUT.as_secs()
                ))
            })??;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let cause = stderr
                .lines()
                .rev()
                .find(|l| !l.trim().is_empty())
                .unwrap_or("extractor exited with an error")
                .chars()
                .take(STDERR_TAIL)
                .collect::<String>();
            return Err(ResolverError::Extraction(cause));
        }

        parse_payload(&output.stdout)
    }
}

/// Décode la sortie JSON : soit un objet unique (lien direct), soit une
/// enveloppe de recherche avec un tableau `entries`.
fn parse_payload(stdout: &[u8]) -> Result<Vec<RawTrack>> {
    let value: serde_json::Value = serde_json::from_slice(stdout)?;
    if value.get("entries").is_some() {
        let payload: SearchPayload = serde_json::from_value(value)?;
        Ok(payload.entries)
    } else {
        Ok(vec![serde_json::from_value(value)?])
    }
}

#[async_trait::async_trait]
impl LookupBackend for YtDlpBackend {
    async fn lookup_one(&self, request: &LookupRequest) -> Result<RawTrack> {
        self.run(request, None)
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| ResolverError::NoResult(request.query.clone()))
    }

    async fn lookup_top(&self, request: &LookupRequest, n: usize) -> Result<Vec<RawTrack>> {
        let results = self.run(request, Some(n)).await?;
        if results.is_empty() {
            return Err(ResolverError::NoResult(request.query.clone()));
        }
        Ok(results.into_iter().take(n).collect())
    }
}
