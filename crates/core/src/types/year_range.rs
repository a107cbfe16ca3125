use crate::error::CoreError;

/// Inclusive publication-year bounds. Either side may be open.
///
/// `start <= end` holds whenever both are set: every constructor and edit
/// repairs the pair instead of rejecting it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct YearRange {
    start: Option<i32>,
    end: Option<i32>,
}

/// A single edit made through one of the two year pickers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum YearEdit {
    From(Option<i32>),
    To(Option<i32>),
}

impl YearRange {
    pub const UNBOUNDED: YearRange = YearRange {
        start: None,
        end: None,
    };

    /// Builds a range from raw bounds. An inverted pair is treated as if
    /// "from" had just been edited, so `end` is raised to `start`.
    pub fn new(start: Option<i32>, end: Option<i32>) -> Self {
        YearRange { start, end }.apply(YearEdit::From(start))
    }

    pub fn start(&self) -> Option<i32> {
        self.start
    }

    pub fn end(&self) -> Option<i32> {
        self.end
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }

    /// Applies a picker edit. The bound that was not touched moves to meet
    /// the edited one when they would cross.
    pub fn apply(self, edit: YearEdit) -> Self {
        match edit {
            YearEdit::From(start) => {
                let end = match (start, self.end) {
                    (Some(from), Some(to)) if from > to => Some(from),
                    _ => self.end,
                };
                YearRange { start, end }
            }
            YearEdit::To(end) => {
                let start = match (self.start, end) {
                    (Some(from), Some(to)) if to < from => Some(to),
                    _ => self.start,
                };
                YearRange { start, end }
            }
        }
    }

    /// Parses `start~end`, where either side may be blank (`1990~`, `~2001`).
    /// A single year (`2004`) pins both bounds.
    pub fn parse(input: &str) -> Result<Self, CoreError> {
        let trimmed = input.trim();
        let Some((left, right)) = trimmed.split_once('~') else {
            let year = parse_year(trimmed)?;
            return Ok(YearRange::new(Some(year), Some(year)));
        };
        let start = if left.trim().is_empty() {
            None
        } else {
            Some(parse_year(left.trim())?)
        };
        let end = if right.trim().is_empty() {
            None
        } else {
            Some(parse_year(right.trim())?)
        };
        if start.is_none() && end.is_none() {
            return Err(CoreError::InvalidYearRange(trimmed.to_string()));
        }
        Ok(YearRange::new(start, end))
    }

    pub fn contains(&self, year: i32) -> bool {
        self.start.is_none_or(|start| year >= start) && self.end.is_none_or(|end| year <= end)
    }
}

fn parse_year(input: &str) -> Result<i32, CoreError> {
    input
        .parse()
        .map_err(|_| CoreError::InvalidYearRange(input.to_string()))
}
