//! # voxresolver - Résolveur de pistes pour VoxQueue
//!
//! Cette crate convertit une requête utilisateur (mots-clés ou lien
//! direct) en une piste lisible, avec un cache des résolutions à durée
//! de vie du processus et un fallback ordonné sur plusieurs profils
//! d'accès amont.
//!
//! ## Architecture
//!
//! - `TrackResolver` : résolveur principal (cache + fallback)
//! - `models` : structures de données (Track, TrackCandidate, RawTrack)
//! - `upstream` : frontière du service de recherche amont
//! - `ytdlp` : implémentation de production (sous-processus `yt-dlp`)
//! - `profile` : profils d'accès essayés dans l'ordre
//! - `cache` : cache mémoire requête brute → résolution
//! - `error` : gestion des erreurs
//!
//! ## Utilisation
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use voxresolver::{TrackResolver, YtDlpBackend};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = Arc::new(YtDlpBackend::from_config());
//!     let resolver = TrackResolver::new(backend);
//!
//!     let track = resolver.resolve("daft punk around the world", "ayu").await?;
//!     println!("{} ({:?}s)", track.title, track.duration_secs);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
pub mod models;
pub mod profile;
pub mod resolver;
pub mod upstream;
pub mod ytdlp;

pub use cache::ResolverCache;
pub use error::{ResolverError, Result};
pub use models::{RawTrack, Track, TrackCandidate};
pub use profile::{AccessProfile, default_profiles};
pub use resolver::TrackResolver;
pub use upstream::{LookupBackend, LookupRequest, QueryKind};
pub use ytdlp::YtDlpBackend;
