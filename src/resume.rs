//! Resume dataset
//!
//! The structured record the site is built from. It is read-only once loaded;
//! the page reads it for layout and the assistant serializes it as context.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while loading a resume
#[derive(Error, Debug)]
pub enum ResumeError {
    /// The file extension is not one we can parse
    #[error("unsupported resume format: {0}")]
    UnsupportedFormat(String),

    /// An I/O error occurred
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The YAML document did not match the resume shape
    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The JSON document did not match the resume shape
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Contact and summary details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Personal {
    pub name: String,
    pub title: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    pub location: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    pub summary: String,
    /// Hobbies the assistant may mention when asked
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub interests: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SkillCategory {
    pub category: String,
    pub items: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExperienceItem {
    pub company: String,
    pub role: String,
    pub period: String,
    /// Employment type, e.g. "Full time"
    #[serde(rename = "type")]
    pub kind: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectItem {
    pub title: String,
    pub role: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EducationItem {
    pub institution: String,
    pub degree: String,
    #[serde(default)]
    pub details: Vec<String>,
}

/// The complete resume
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResumeData {
    pub personal: Personal,
    #[serde(default)]
    pub skills: Vec<SkillCategory>,
    #[serde(default)]
    pub experience: Vec<ExperienceItem>,
    #[serde(default)]
    pub projects: Vec<ProjectItem>,
    #[serde(default)]
    pub education: Vec<EducationItem>,
}

impl ResumeData {
    /// Load from a `.yaml`, `.yml` or `.json` file
    pub fn load(path: &Path) -> Result<Self, ResumeError> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        let contents = match ext.as_str() {
            "yaml" | "yml" | "json" => std::fs::read_to_string(path)?,
            _ => return Err(ResumeError::UnsupportedFormat(path.display().to_string())),
        };

        let resume = if ext == "json" {
            Self::from_json(&contents)?
        } else {
            Self::from_yaml(&contents)?
        };

        tracing::debug!(path = %path.display(), name = %resume.personal.name, "loaded resume");
        Ok(resume)
    }

    pub fn from_yaml(contents: &str) -> Result<Self, ResumeError> {
        Ok(serde_yaml::from_str(contents)?)
    }

    pub fn from_json(contents: &str) -> Result<Self, ResumeError> {
        Ok(serde_json::from_str(contents)?)
    }

    /// Serialize the whole record as the assistant's context
    pub fn to_context_json(&self) -> Result<String, ResumeError> {
        Ok(serde_json::to_string(self)?)
    }
}
