/// Sort direction for an ORDER BY key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    pub fn as_sql(self) -> &'static str {
        match self {
            Direction::Asc => "ASC",
            Direction::Desc => "DESC",
        }
    }
}

/// A single ORDER BY key, parsed from a `"column"` or `"column:direction"`
/// spec string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    pub column: String,
    pub direction: Direction,
}

impl SortKey {
    /// Parse a spec string. Never fails: the direction defaults to ascending,
    /// and any token other than `desc` (case-insensitive) falls back to
    /// ascending as well.
    pub fn parse(spec: &str) -> Self {
        let (column, direction) = match spec.split_once(':') {
            Some((column, direction)) => (column, direction),
            None => (spec, ""),
        };
        let direction = if direction.trim().eq_ignore_ascii_case("desc") {
            Direction::Desc
        } else {
            Direction::Asc
        };
        Self {
            column: column.trim().to_string(),
            direction,
        }
    }

    /// Parse a comma-separated list of spec strings, e.g. `"name:desc,id"`.
    pub fn parse_list(specs: &str) -> Vec<Self> {
        specs
            .split(',')
            .map(str::trim)
            .filter(|spec| !spec.is_empty())
            .map(Self::parse)
            .collect()
    }
}
