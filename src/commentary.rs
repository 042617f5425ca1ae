use std::fmt;
use std::time::Duration;

use serde::Deserialize;
use serde_json::json;

use crate::config::Config;
use crate::grid::Grid;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const PROMPT_PREAMBLE: &str = "\
You are an expert on cellular automata and Conway's Game of Life.
Analyze the following pattern (O = alive cell, . = dead).

Grid:
";

const PROMPT_TASKS: &str = "
Tasks:
1. Identify known objects (glider, blinker, block, loaf, etc.) if present.
2. If it is a chaotic cluster, describe its density.
3. Estimate whether the pattern looks stable, oscillating, or exploding.

Answer briefly, at most 3 sentences. Be witty or philosophical.";

/// Failure modes of the commentary call. Every variant renders as a
/// user-visible message; the simulation state is never affected.
#[derive(Debug)]
pub enum CommentaryError {
    /// Nothing alive to analyze.
    EmptyGrid,
    /// Network failure or non-success status from the service.
    Upstream(String),
    /// The service replied, but without any usable text.
    MalformedReply,
}

impl fmt::Display for CommentaryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CommentaryError::EmptyGrid => {
                write!(f, "The grid is empty. Draw some cells first!")
            }
            CommentaryError::Upstream(e) => {
                write!(f, "Error communicating with the AI service: {e}")
            }
            CommentaryError::MalformedReply => {
                write!(f, "The AI service returned no usable analysis.")
            }
        }
    }
}

impl std::error::Error for CommentaryError {}

/// Render the bounding box of alive cells as an `O`/`.` block, one row per
/// line. Cropping keeps the request small and focused on the content.
/// Returns `None` for a lifeless grid.
pub fn format_region(grid: &Grid) -> Option<String> {
    let (r0, c0, r1, c1) = grid.bounding_box()?;
    let mut out = String::with_capacity((r1 - r0 + 1) * (c1 - c0 + 2));
    for r in r0..=r1 {
        for c in c0..=c1 {
            out.push(if grid.get(r, c) { 'O' } else { '.' });
        }
        out.push('\n');
    }
    Some(out)
}

// Response shape of the generateContent endpoint, reduced to the fields
// the text extraction needs.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Content,
}

#[derive(Debug, Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Thin blocking client for the pattern commentary service.
pub struct Analyst {
    http: reqwest::blocking::Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl Analyst {
    /// Availability check: `None` when no API key is configured, so the
    /// caller can show "not configured" instead of attempting a call.
    pub fn from_config(config: &Config) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        let http = reqwest::blocking::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .ok()?;
        Some(Self {
            http,
            api_key,
            model: config.model.clone(),
            base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
        })
    }

    /// Ask the service for free-text commentary on the current pattern.
    /// Consumes only a read-only snapshot of the grid.
    pub fn analyze(&self, grid: &Grid) -> Result<String, CommentaryError> {
        let region = format_region(grid).ok_or(CommentaryError::EmptyGrid)?;
        let prompt = format!("{PROMPT_PREAMBLE}{region}{PROMPT_TASKS}");

        let url = format!(
            "{}/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });

        let response = self
            .http
            .post(url)
            .json(&body)
            .send()
            .map_err(|e| CommentaryError::Upstream(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(CommentaryError::Upstream(format!("status {status}")));
        }

        let reply: GenerateResponse = response
            .json()
            .map_err(|e| CommentaryError::Upstream(e.to_string()))?;

        let text = reply
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .filter(|t| !t.trim().is_empty())
            .ok_or(CommentaryError::MalformedReply)?;

        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::{pattern_blinker, Grid};

    #[test]
    fn test_format_region_crops_to_bounding_box() {
        let mut grid = Grid::empty_default();
        grid.place_pattern(&pattern_blinker(), Some((10, 10)));
        assert_eq!(format_region(&grid).unwrap(), "OOO\n");

        let mut l_shape = Grid::empty(8, 8);
        l_shape.set(2, 2, true);
        l_shape.set(3, 2, true);
        l_shape.set(3, 3, true);
        assert_eq!(format_region(&l_shape).unwrap(), "O.\nOO\n");
    }

    #[test]
    fn test_format_region_empty_grid() {
        assert_eq!(format_region(&Grid::empty_default()), None);
    }

    #[test]
    fn test_analyst_requires_api_key() {
        let config = Config {
            state_path: "x.json".into(),
            interval: crate::driver::DEFAULT_INTERVAL,
            api_key: None,
            model: "gemini-2.5-flash".to_string(),
        };
        assert!(Analyst::from_config(&config).is_none());

        let configured = Config {
            api_key: Some("test-key".to_string()),
            ..config
        };
        assert!(Analyst::from_config(&configured).is_some());
    }

    #[test]
    fn test_response_text_extraction() {
        let raw = r#"{
            "candidates": [
                { "content": { "parts": [ { "text": "A lone blinker." } ] } }
            ]
        }"#;
        let reply: GenerateResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(reply.candidates[0].content.parts[0].text, "A lone blinker.");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(empty.candidates.is_empty());
    }
}
