//! Catalog Record Module
//! One row of the catalog dataset and its derived fields.

use super::deriver::{
    derive_calendar_parts, derive_numeric_prefix, derive_primary_country, derive_year_gap,
    split_multi_value, CalendarParts,
};
use serde::Serialize;
use std::fmt;

/// Kind of catalog title.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum TitleType {
    Movie,
    #[serde(rename = "TV Show")]
    TvShow,
}

impl TitleType {
    pub const ALL: [TitleType; 2] = [TitleType::Movie, TitleType::TvShow];

    /// Parse the dataset's `type` column ("Movie" / "TV Show").
    pub fn parse(raw: &str) -> Option<Self> {
        let normalized: String = raw
            .trim()
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();
        match normalized.as_str() {
            "movie" => Some(TitleType::Movie),
            "tvshow" => Some(TitleType::TvShow),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            TitleType::Movie => "Movie",
            TitleType::TvShow => "TV Show",
        }
    }
}

impl fmt::Display for TitleType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A single catalog entry. Raw fields are never mutated; derived fields are
/// recomputed on demand.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub title: Option<String>,
    pub title_type: TitleType,
    pub countries: Option<String>,
    pub rating: Option<String>,
    pub release_year: i32,
    pub duration_raw: Option<String>,
    pub date_added_raw: Option<String>,
    pub directors_raw: Option<String>,
}

impl Record {
    /// Minimal record, mostly useful for building fixtures.
    pub fn new(title_type: TitleType, release_year: i32) -> Self {
        Self {
            title: None,
            title_type,
            countries: None,
            rating: None,
            release_year,
            duration_raw: None,
            date_added_raw: None,
            directors_raw: None,
        }
    }

    pub fn with_countries(mut self, countries: impl Into<String>) -> Self {
        self.countries = Some(countries.into());
        self
    }

    pub fn with_rating(mut self, rating: impl Into<String>) -> Self {
        self.rating = Some(rating.into());
        self
    }

    pub fn with_duration(mut self, duration: impl Into<String>) -> Self {
        self.duration_raw = Some(duration.into());
        self
    }

    pub fn with_date_added(mut self, date_added: impl Into<String>) -> Self {
        self.date_added_raw = Some(date_added.into());
        self
    }

    pub fn with_directors(mut self, directors: impl Into<String>) -> Self {
        self.directors_raw = Some(directors.into());
        self
    }

    pub fn is(&self, title_type: TitleType) -> bool {
        self.title_type == title_type
    }

    pub fn primary_country(&self) -> String {
        derive_primary_country(self.countries.as_deref())
    }

    pub fn countries(&self) -> Vec<String> {
        split_multi_value(self.countries.as_deref())
    }

    pub fn directors(&self) -> Vec<String> {
        split_multi_value(self.directors_raw.as_deref())
    }

    /// Rating, with blank values treated as absent.
    pub fn rating(&self) -> Option<&str> {
        self.rating
            .as_deref()
            .map(str::trim)
            .filter(|rating| !rating.is_empty())
    }

    /// Runtime in minutes. Absent for TV shows.
    pub fn duration_minutes(&self) -> Option<u32> {
        if !self.is(TitleType::Movie) {
            return None;
        }
        derive_numeric_prefix(self.duration_raw.as_deref())
    }

    /// Season count. Absent for movies.
    pub fn num_seasons(&self) -> Option<u32> {
        if !self.is(TitleType::TvShow) {
            return None;
        }
        derive_numeric_prefix(self.duration_raw.as_deref())
    }

    pub fn calendar_parts(&self) -> Option<CalendarParts> {
        derive_calendar_parts(self.date_added_raw.as_deref())
    }

    pub fn year_added(&self) -> Option<i32> {
        self.calendar_parts().map(|parts| parts.year)
    }

    pub fn month_added(&self) -> Option<u32> {
        self.calendar_parts().map(|parts| parts.month)
    }

    pub fn year_gap(&self) -> Option<i32> {
        derive_year_gap(self.year_added(), Some(self.release_year))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_type_parses_dataset_labels() {
        assert_eq!(TitleType::parse("Movie"), Some(TitleType::Movie));
        assert_eq!(TitleType::parse("TV Show"), Some(TitleType::TvShow));
        assert_eq!(TitleType::parse(" tv show "), Some(TitleType::TvShow));
        assert_eq!(TitleType::parse("Podcast"), None);
    }

    #[test]
    fn duration_is_labelled_by_type() {
        let movie = Record::new(TitleType::Movie, 2019).with_duration("90 min");
        let show = Record::new(TitleType::TvShow, 2019).with_duration("3 Seasons");

        assert_eq!(movie.duration_minutes(), Some(90));
        assert_eq!(movie.num_seasons(), None);
        assert_eq!(show.num_seasons(), Some(3));
        assert_eq!(show.duration_minutes(), None);
    }

    #[test]
    fn year_gap_uses_release_year() {
        let record = Record::new(TitleType::Movie, 2022).with_date_added("January 5, 2020");
        assert_eq!(record.year_added(), Some(2020));
        assert_eq!(record.month_added(), Some(1));
        assert_eq!(record.year_gap(), Some(-2));

        let undated = Record::new(TitleType::Movie, 2022).with_date_added("someday");
        assert_eq!(undated.year_gap(), None);
    }

    #[test]
    fn blank_rating_is_absent() {
        let record = Record::new(TitleType::Movie, 2020).with_rating("  ");
        assert_eq!(record.rating(), None);
    }
}
