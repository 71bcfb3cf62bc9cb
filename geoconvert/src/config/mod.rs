//! Configuration de l'outil

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use geodesie::{ClassifierConfig, CoordinateSystem};
use tracing::debug;

/// Variable d'environnement désignant le fichier de configuration
pub const CONFIG_ENV: &str = "GEOCONVERT_CONFIG";

/// Configuration principale
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Système source quand `--from` est absent
    pub default_from: CoordinateSystem,

    /// Système cible quand `--to` est absent
    pub default_to: CoordinateSystem,

    /// Décimales affichées en console
    pub precision: Precision,

    /// Grille de géoïde à la place du modèle linéaire
    pub geoid_grid: Option<PathBuf>,

    /// Bornes de détection du système
    pub classifier: ClassifierConfig,
}

/// Nombre de décimales selon l'unité
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct Precision {
    /// Systèmes projetés (mètres)
    pub metric: usize,
    /// WGS84 (degrés)
    pub degrees: usize,
}

impl Default for Precision {
    fn default() -> Self {
        Self {
            metric: 3,
            degrees: 8,
        }
    }
}

impl Precision {
    /// Décimales adaptées au système
    pub fn for_system(&self, system: CoordinateSystem) -> usize {
        if geodesie::parameters_of(system).is_geographic() {
            self.degrees
        } else {
            self.metric
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            default_from: CoordinateSystem::Lambert93,
            default_to: CoordinateSystem::Wgs84,
            precision: Precision::default(),
            geoid_grid: None,
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Config {
    /// Charge une configuration depuis un fichier
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        serde_json::from_str(&content).context("Failed to parse config JSON")
    }

    /// Résout la configuration : `--config`, puis `GEOCONVERT_CONFIG`, puis défauts
    ///
    /// La valeur est un nom de preset ou un chemin vers un fichier JSON.
    pub fn resolve(explicit: Option<&str>) -> Result<Self> {
        if let Some(name) = explicit {
            debug!(config = name, "Loading config from --config");
            return Self::from_name(name);
        }

        match std::env::var(CONFIG_ENV) {
            Ok(name) if !name.is_empty() => {
                debug!(config = %name, "Loading config from {}", CONFIG_ENV);
                Self::from_name(&name)
            }
            _ => Ok(Self::default()),
        }
    }

    fn from_name(name: &str) -> Result<Self> {
        match name {
            "default" | "narrow-zones" => Self::from_preset(name),
            _ => Self::load(Path::new(name)),
        }
    }

    /// Charge une configuration depuis un preset embarqué
    pub fn from_preset(preset: &str) -> Result<Self> {
        match preset {
            "default" => Ok(Self::default()),
            "narrow-zones" => Self::load_embedded(include_str!("presets/narrow-zones.json")),
            _ => anyhow::bail!("Unknown preset: {}. Use: default, narrow-zones", preset),
        }
    }

    fn load_embedded(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse embedded config")
    }
}
