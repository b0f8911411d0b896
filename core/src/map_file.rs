use std::fs;
use std::path::Path;

use crate::*;

/// Parses map text into rows of raw cell values.
///
/// Accepts either a plain grid, one row per line with values separated by whitespace or commas,
/// or a JSON array of rows. Dimensions and value domain are checked later by
/// [`Board::load_from_source`].
pub fn parse_map(text: &str) -> core::result::Result<Vec<Vec<i64>>, MapFormatError> {
    let text = text.trim();
    if text.is_empty() {
        return Err(MapFormatError::Empty);
    }

    if text.starts_with('[') {
        return serde_json::from_str(text).map_err(|err| {
            log::debug!("Map is not valid JSON: {err}");
            MapFormatError::Json
        });
    }

    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            line.split(|c: char| c.is_whitespace() || c == ',')
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token
                        .parse::<i64>()
                        .map_err(|_| MapFormatError::NotAnInteger { line: index + 1 })
                })
                .collect::<core::result::Result<Vec<i64>, _>>()
        })
        .collect()
}

/// Reads a map file and builds a board of the given size from it.
pub fn read_map(path: &Path, size: Coord2) -> Result<Board> {
    let text = fs::read_to_string(path).map_err(|err| {
        log::debug!("Cannot read map {}: {err}", path.display());
        MapFormatError::Unreadable
    })?;
    let raw_grid = parse_map(&text)?;
    Board::load_from_source(size, &raw_grid)
}

/// Text form of a board, the format [`parse_map`] reads back.
pub fn render_map(board: &Board) -> String {
    let mut out = String::new();
    for row in board.to_raw_grid() {
        let line: Vec<String> = row.iter().map(|value| value.to_string()).collect();
        out.push_str(&line.join(" "));
        out.push('\n');
    }
    out
}

pub fn write_map(board: &Board, path: &Path) -> core::result::Result<(), PersistenceError> {
    fs::write(path, render_map(board)).map_err(|source| PersistenceError::WriteFailed {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_whitespace_grid() {
        let grid = parse_map("-1 1 0\n 1 1 0 \n\n").unwrap();

        assert_eq!(grid, vec![vec![-1, 1, 0], vec![1, 1, 0]]);
    }

    #[test]
    fn parses_comma_separated_grid() {
        let grid = parse_map("-1,1\n1,1").unwrap();

        assert_eq!(grid, vec![vec![-1, 1], vec![1, 1]]);
    }

    #[test]
    fn parses_json_grid() {
        let grid = parse_map("[[0, 1], [1, -1]]").unwrap();

        assert_eq!(grid, vec![vec![0, 1], vec![1, -1]]);
    }

    #[test]
    fn reports_bad_tokens_with_line() {
        assert_eq!(parse_map("0 0\n0 x"), Err(MapFormatError::NotAnInteger { line: 2 }));
        assert_eq!(parse_map("   \n"), Err(MapFormatError::Empty));
        assert_eq!(parse_map("[[0, 1],"), Err(MapFormatError::Json));
    }

    #[test]
    fn rendered_map_loads_back() {
        let board = Board::from_mine_coords((3, 3), &[(0, 0), (2, 1)]).unwrap();
        let text = render_map(&board);

        assert!(text.starts_with("-1 1 0\n"));
        let loaded = Board::load_from_source((3, 3), &parse_map(&text).unwrap()).unwrap();
        assert_eq!(loaded, board);
    }

    #[test]
    fn missing_file_is_unreadable() {
        let path = std::env::temp_dir().join("sapper-map-that-does-not-exist.txt");

        assert_eq!(
            read_map(&path, CLASSIC_SIZE),
            Err(GameError::InvalidFormat(MapFormatError::Unreadable))
        );
    }
}
