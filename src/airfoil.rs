//! Airfoil coordinate files.
//!
//! The `.dat` format is a display name on the first line followed by one
//! `x y` record per line. Columns are fixed width, so the spacing around a
//! negative second coordinate is inconsistent and a plain whitespace split
//! is not enough; see [`split_record`].

use std::fs;
use std::num::ParseFloatError;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::geometry::Vec2;

/// Run of spaces that fixed-width writers use between columns.
const WIDE_GAP: &str = "      ";
const NARROW_GAP: &str = "  ";
const CHORD_CENTER_OFFSET: f64 = 0.5;
const CLOSED_LOOP_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read airfoil file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("airfoil file has no name line")]
    MissingName,
    #[error("airfoil `{name}` has no coordinate records")]
    NoPoints { name: String },
    #[error("line {line}: expected two coordinates, got `{content}`")]
    MalformedRecord { line: usize, content: String },
    #[error("line {line}: `{token}` is not a number: {source}")]
    InvalidNumber {
        line: usize,
        token: String,
        #[source]
        source: ParseFloatError,
    },
    #[error("line {line}: coordinate `{token}` is not finite")]
    NonFiniteCoordinate { line: usize, token: String },
}

/// How raw file coordinates map into the model plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoadOptions {
    /// Shift x by -0.5 so a [0, 1] chord becomes [-0.5, 0.5].
    pub center_chord: bool,
    /// Negate y.
    pub flip_y: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self {
            center_chord: true,
            flip_y: true,
        }
    }
}

impl LoadOptions {
    fn x_offset(&self) -> f64 {
        if self.center_chord {
            -CHORD_CENTER_OFFSET
        } else {
            0.0
        }
    }

    fn y_sign(&self) -> f64 {
        if self.flip_y {
            -1.0
        } else {
            1.0
        }
    }
}

/// A named, ordered airfoil outline. Consecutive points form the panels.
#[derive(Debug, Clone, PartialEq)]
pub struct Airfoil {
    name: String,
    points: Vec<Vec2>,
    options: LoadOptions,
}

impl Airfoil {
    /// Read and parse an airfoil file.
    pub fn load<P: AsRef<Path>>(path: P, options: LoadOptions) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let airfoil = Self::parse(&contents, options)?;

        tracing::info!(
            name = %airfoil.name,
            points = airfoil.points.len(),
            closed = airfoil.is_closed(),
            path = %path.display(),
            "loaded airfoil"
        );
        let repeated = airfoil.repeated_points();
        if repeated > 0 {
            tracing::warn!(
                name = %airfoil.name,
                repeated,
                "outline repeats consecutive points; those panels have no normal or vortex"
            );
        }
        Ok(airfoil)
    }

    /// Parse the text of an airfoil file.
    pub fn parse(contents: &str, options: LoadOptions) -> Result<Self, LoadError> {
        let mut lines = contents.lines();
        let name = lines
            .next()
            .map(|line| line.trim_start_matches('\u{feff}').trim())
            .filter(|name| !name.is_empty())
            .ok_or(LoadError::MissingName)?
            .to_string();

        let mut points = Vec::new();
        for (index, line) in lines.enumerate() {
            // The name occupies line 1.
            let line_number = index + 2;
            if line.trim().is_empty() {
                tracing::debug!(line = line_number, "skipping blank line");
                continue;
            }

            let (x, y) = split_record(line).ok_or_else(|| LoadError::MalformedRecord {
                line: line_number,
                content: line.to_string(),
            })?;
            let x = parse_coordinate(&x, line_number)?;
            let y = parse_coordinate(&y, line_number)?;

            points.push(Vec2::new(x + options.x_offset(), y * options.y_sign()));
        }

        if points.is_empty() {
            return Err(LoadError::NoPoints { name });
        }

        Ok(Self {
            name,
            points,
            options,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Outline points in file order, after the load-time offset and flip.
    pub fn points(&self) -> &[Vec2] {
        &self.points
    }

    pub fn options(&self) -> LoadOptions {
        self.options
    }

    /// Whether the outline ends where it starts.
    pub fn is_closed(&self) -> bool {
        match (self.points.first(), self.points.last()) {
            (Some(first), Some(last)) if self.points.len() > 2 => {
                (first - last).norm() <= CLOSED_LOOP_TOLERANCE
            }
            _ => false,
        }
    }

    /// Consecutive point pairs that coincide, i.e. zero-length panels.
    pub fn repeated_points(&self) -> usize {
        self.points.windows(2).filter(|pair| pair[0] == pair[1]).count()
    }

    /// Render back to the `.dat` format, undoing the load-time offset and flip.
    pub fn to_dat(&self) -> String {
        let mut out = String::with_capacity(self.name.len() + self.points.len() * 24);
        out.push_str(&self.name);
        out.push('\n');
        for point in &self.points {
            let x = point.x - self.options.x_offset();
            let y = point.y * self.options.y_sign();
            out.push_str(&format!("{x:>10.6} {y:>10.6}\n"));
        }
        out
    }
}

/// Split a coordinate record into its x and y tokens.
///
/// Six-space runs are first collapsed to two. A record with a packed
/// negative (`" -"`) is split on single spaces; anything else is split on
/// two-space runs, falling back to single spaces when that gives fewer than
/// two tokens. Tokens are trimmed and empty ones dropped; anything past the
/// second token is ignored.
pub fn split_record(line: &str) -> Option<(String, String)> {
    let collapsed = line.replace(WIDE_GAP, NARROW_GAP);
    let trimmed = collapsed.trim();

    if trimmed.contains(" -") {
        first_two(trimmed, " ")
    } else {
        first_two(trimmed, NARROW_GAP).or_else(|| first_two(trimmed, " "))
    }
}

fn first_two(text: &str, separator: &str) -> Option<(String, String)> {
    let mut tokens = text
        .split(separator)
        .map(str::trim)
        .filter(|token| !token.is_empty());
    let x = tokens.next()?;
    let y = tokens.next()?;
    Some((x.to_string(), y.to_string()))
}

fn parse_coordinate(token: &str, line: usize) -> Result<f64, LoadError> {
    let value = token.parse::<f64>().map_err(|source| LoadError::InvalidNumber {
        line,
        token: token.to_string(),
        source,
    })?;
    if !value.is_finite() {
        return Err(LoadError::NonFiniteCoordinate {
            line,
            token: token.to_string(),
        });
    }
    Ok(value)
}
