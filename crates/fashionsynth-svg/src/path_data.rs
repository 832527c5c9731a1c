//! Numeric scanning for `points` lists and path `d` strings.
//!
//! Curve control points are not told apart from endpoints: every
//! consecutive pair of numbers becomes one vertex, so curves turn into
//! polylines through all of their numeric pairs.

use fashionsynth_math::Point2;

/// SVG path command letters, both cases.
const PATH_COMMANDS: &str = "MLCZHVSQTAmlczhvsqta";

/// Scan every number of the form `-?\d+\.?\d*` in order.
///
/// Exponents and leading-dot fractions are not recognised; `1e-5` scans
/// as `1` followed by `-5`, and `.5` as `5`.
pub fn scan_numbers(text: &str) -> Vec<f64> {
    let bytes = text.as_bytes();
    let mut numbers = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        let negative =
            bytes[i] == b'-' && bytes.get(i + 1).is_some_and(|b| b.is_ascii_digit());
        if !negative && !bytes[i].is_ascii_digit() {
            i += 1;
            continue;
        }
        let start = i;
        let mut j = if negative { i + 1 } else { i };
        while j < bytes.len() && bytes[j].is_ascii_digit() {
            j += 1;
        }
        if j < bytes.len() && bytes[j] == b'.' {
            j += 1;
            while j < bytes.len() && bytes[j].is_ascii_digit() {
                j += 1;
            }
        }
        if let Ok(value) = text[start..j].parse::<f64>() {
            numbers.push(value);
        }
        i = j;
    }
    numbers
}

fn pair_up(numbers: &[f64]) -> impl Iterator<Item = Point2> + '_ {
    numbers.chunks_exact(2).map(|c| Point2::new(c[0], c[1]))
}

/// Parse a polygon/polyline `points` attribute.
pub fn parse_points(points: &str) -> Vec<Point2> {
    pair_up(&scan_numbers(points)).collect()
}

/// Parse a path `d` attribute.
///
/// The string is split on command letters and each command's numbers
/// are paired independently, so an odd trailing number in one command
/// never pairs with the next command's first number.
pub fn parse_path_data(d: &str) -> Vec<Point2> {
    let mut points = Vec::new();
    for command in d.split(|c| PATH_COMMANDS.contains(c)) {
        if command.trim().is_empty() {
            continue;
        }
        points.extend(pair_up(&scan_numbers(command)));
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_numbers_regex_semantics() {
        assert_eq!(scan_numbers("10,20 -3.5 4."), vec![10.0, 20.0, -3.5, 4.0]);
        assert_eq!(scan_numbers("1e-5"), vec![1.0, -5.0]);
        assert_eq!(scan_numbers(".5 - 7"), vec![5.0, 7.0]);
        assert!(scan_numbers("abc").is_empty());
    }

    #[test]
    fn test_parse_points_drops_unpaired() {
        let pts = parse_points("0,0 10,0 10,10 5");
        assert_eq!(pts.len(), 3);
        assert_eq!(pts[2], Point2::new(10.0, 10.0));
    }

    #[test]
    fn test_path_pairs_per_command() {
        // The lone 7 in the first L never pairs with the C numbers.
        let pts = parse_path_data("M0 0 L10 0 7 C 20 5 20 15 10 20 Z");
        assert_eq!(
            pts,
            vec![
                Point2::new(0.0, 0.0),
                Point2::new(10.0, 0.0),
                Point2::new(20.0, 5.0),
                Point2::new(20.0, 15.0),
                Point2::new(10.0, 20.0),
            ]
        );
    }

    #[test]
    fn test_path_lowercase_commands() {
        let pts = parse_path_data("m1,2l3,4h5v6z");
        assert_eq!(pts, vec![Point2::new(1.0, 2.0), Point2::new(3.0, 4.0)]);
    }
}
