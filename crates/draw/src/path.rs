use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::DrawError;

/// Address of a vertex inside a feature, written `"ring.index"` for polygons
/// and `"part.ring.index"` for multi-geometries.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct CoordPath(Vec<usize>);

impl CoordPath {
    pub fn new(parts: Vec<usize>) -> Self {
        CoordPath(parts)
    }

    pub fn ring(ring: usize, index: usize) -> Self {
        CoordPath(vec![ring, index])
    }

    pub fn parts(&self) -> &[usize] {
        &self.0
    }

    /// Trailing vertex index, if any.
    pub fn index(&self) -> Option<usize> {
        self.0.last().copied()
    }
}

impl std::fmt::Display for CoordPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for (i, part) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            write!(f, "{part}")?;
        }
        Ok(())
    }
}

impl FromStr for CoordPath {
    type Err = DrawError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.is_empty() {
            return Ok(CoordPath(Vec::new()));
        }
        s.split('.')
            .map(|part| {
                part.parse::<usize>()
                    .map_err(|_| DrawError::InvalidCoordPath(s.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()
            .map(CoordPath)
    }
}

impl TryFrom<String> for CoordPath {
    type Error = DrawError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<CoordPath> for String {
    fn from(path: CoordPath) -> Self {
        path.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::CoordPath;
    use crate::DrawError;

    #[test]
    fn parses_and_prints_dotted_paths() {
        let p: CoordPath = "1.0.2".parse().expect("parse");
        assert_eq!(p.parts(), &[1, 0, 2]);
        assert_eq!(p.to_string(), "1.0.2");
        assert_eq!(CoordPath::ring(0, 3).to_string(), "0.3");
        assert_eq!(p.index(), Some(2));
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(
            "0.x".parse::<CoordPath>(),
            Err(DrawError::InvalidCoordPath("0.x".to_string()))
        );
    }
}
