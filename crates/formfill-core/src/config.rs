//! Batch configuration loaded from TOML.
//!
//! Every section is optional; a missing file section falls back to the
//! values the current templates were designed for.
//!
//! ```toml
//! [templates]
//! contract = "templates/VV_Vorlage.pdf"
//! contract_terms = "templates/VV_Seite2.pdf"
//! object_list = "templates/OL_Vorlage_normalized.pdf"
//!
//! [annex]
//! chunk_size = 12
//! ```

use crate::error::FormFillError;
use crate::overlay::{AnnexLayout, ContractLayout, TextStyle};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormFillConfig {
    pub templates: TemplatePaths,
    pub text: TextConfig,
    pub annex: AnnexConfig,
    pub fees: FeeConfig,
    pub output: OutputConfig,
    /// Field positions on the contract page.
    pub contract_layout: ContractLayout,
    /// Table geometry of the object-list page.
    pub annex_layout: AnnexLayout,
}

impl FormFillConfig {
    /// Load a TOML file. Relative template paths are resolved against the
    /// directory holding the file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let mut config = Self::from_str(&content)
            .with_context(|| format!("Invalid config file: {}", path.display()))?;
        if let Some(base) = path.parent() {
            config.templates = config.templates.resolved_against(base);
            config.output.work_dir = config.output.work_dir.map(|dir| resolve(base, dir));
        }
        Ok(config)
    }

    pub fn from_str(s: &str) -> anyhow::Result<Self> {
        let config: Self = toml::from_str(s).context("Failed to parse TOML configuration")?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), FormFillError> {
        let text = &self.text;
        if text.max_lines == 0 {
            return Err(FormFillError::Config("text.max_lines must be at least 1".into()));
        }
        if text.min_font_size == 0 {
            return Err(FormFillError::Config("text.min_font_size must be at least 1".into()));
        }
        for (name, size) in [
            ("contract_font_size", text.contract_font_size),
            ("annex_font_size", text.annex_font_size),
        ] {
            if size < text.min_font_size {
                return Err(FormFillError::Config(format!(
                    "text.{} ({}) is below text.min_font_size ({})",
                    name, size, text.min_font_size
                )));
            }
        }

        let capacity = self.annex_layout.rows_per_page();
        if self.annex.chunk_size == 0 || self.annex.chunk_size > capacity {
            return Err(FormFillError::Config(format!(
                "annex.chunk_size must be between 1 and {} (rows per annex page), got {}",
                capacity, self.annex.chunk_size
            )));
        }

        if self.output.max_name_len == 0 {
            return Err(FormFillError::Config("output.max_name_len must be at least 1".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplatePaths {
    pub contract: PathBuf,
    pub contract_terms: Option<PathBuf>,
    pub object_list: PathBuf,
}

impl Default for TemplatePaths {
    fn default() -> Self {
        Self {
            contract: PathBuf::from("templates/VV_Vorlage.pdf"),
            contract_terms: None,
            object_list: PathBuf::from("templates/OL_Vorlage_normalized.pdf"),
        }
    }
}

impl TemplatePaths {
    pub fn resolved_against(self, base: &Path) -> Self {
        Self {
            contract: resolve(base, self.contract),
            contract_terms: self.contract_terms.map(|path| resolve(base, path)),
            object_list: resolve(base, self.object_list),
        }
    }
}

fn resolve(base: &Path, path: PathBuf) -> PathBuf {
    if path.is_relative() {
        base.join(path)
    } else {
        path
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub max_lines: usize,
    pub min_font_size: u16,
    pub contract_font_size: u16,
    pub annex_font_size: u16,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            max_lines: 2,
            min_font_size: 5,
            contract_font_size: 6,
            annex_font_size: 8,
        }
    }
}

impl TextConfig {
    pub fn contract_style(&self) -> TextStyle {
        self.style(self.contract_font_size)
    }

    pub fn annex_style(&self) -> TextStyle {
        self.style(self.annex_font_size)
    }

    fn style(&self, font_size: u16) -> TextStyle {
        TextStyle {
            font_size,
            min_font_size: self.min_font_size,
            max_lines: self.max_lines,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnexConfig {
    /// Objects per annex page.
    pub chunk_size: usize,
}

impl Default for AnnexConfig {
    fn default() -> Self {
        Self { chunk_size: 12 }
    }
}

/// Fee amounts printed on every contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeeConfig {
    pub base: String,
    pub premium: String,
}

impl Default for FeeConfig {
    fn default() -> Self {
        Self {
            base: "8.39".to_string(),
            premium: "9.99".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub max_name_len: usize,
    /// Parent of the per-batch work directory. System temp dir when unset.
    pub work_dir: Option<PathBuf>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            max_name_len: 80,
            work_dir: None,
        }
    }
}
