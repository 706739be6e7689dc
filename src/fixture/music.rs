//! The music example: a song catalog and the `eg.music.Display` fixture that
//! shows its contents as rows.

use std::path::Path;
use std::sync::Arc;

use serde::Serialize;

use super::{RowFixture, RowObject, TargetShape};
use crate::err_msg;
use crate::errors::FitError;

pub const DISPLAY_FIXTURE: &str = "eg.music.Display";
pub const MUSIC_TYPE: &str = "eg.music.Music";

const COLUMNS: [&str; 11] = [
    "title",
    "artist",
    "album",
    "genre",
    "size",
    "seconds",
    "trackNumber",
    "trackCount",
    "year",
    "date",
    "time",
];

const CATALOG_FIELDS: usize = 10;

const BUILTIN_CATALOG: &str = "\
name\tartist\talbum\tgenre\tsize\tseconds\ttrack number\ttrack count\tyear\tdate
Akila\tToure Kunda\tThe Toure Kunda Collection\tWorld\t5627309\t277\t1\t10\t1996\t9/24/03
Agnus Dei\tBarbara Bonney\tThe Heart of Bach\tClassical\t3940138\t227\t5\t12\t1999\t8/19/03
Blue Monday\tNew Order\tSubstance\tPop\t7196318\t449\t2\t12\t1987\t6/02/03
Hotel California\tEagles\tHell Freezes Over\tRock\t9648704\t430\t6\t15\t1994\t7/11/03
So What\tMiles Davis\tKind of Blue\tJazz\t13565280\t565\t1\t5\t1959\t5/30/03
Take Five\tDave Brubeck\tTime Out\tJazz\t7954176\t324\t3\t7\t1959\t5/30/03
";

/// One song in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Music {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub genre: String,
    pub size: u64,
    pub seconds: u32,
    pub track_number: u32,
    pub track_count: u32,
    pub year: u32,
    pub date: String,
}

impl Music {
    /// Play time as `m:ss`.
    pub fn time(&self) -> String {
        format!("{}:{:02}", self.seconds / 60, self.seconds % 60)
    }

    fn from_fields(fields: &[&str], line: usize) -> Result<Self, FitError> {
        if fields.len() != CATALOG_FIELDS {
            return Err(err_msg!(
                Config,
                "music catalog line {}: expected {} fields, found {}",
                line,
                CATALOG_FIELDS,
                fields.len()
            ));
        }
        Ok(Self {
            title: fields[0].to_string(),
            artist: fields[1].to_string(),
            album: fields[2].to_string(),
            genre: fields[3].to_string(),
            size: number(fields[4], "size", line)?,
            seconds: number(fields[5], "seconds", line)?,
            track_number: number(fields[6], "track number", line)?,
            track_count: number(fields[7], "track count", line)?,
            year: number(fields[8], "year", line)?,
            date: fields[9].to_string(),
        })
    }
}

fn number<T: std::str::FromStr>(text: &str, field: &str, line: usize) -> Result<T, FitError> {
    text.trim().parse().map_err(|_| {
        err_msg!(
            Config,
            "music catalog line {}: {} '{}' is not a number",
            line,
            field,
            text
        )
    })
}

impl RowObject for Music {
    fn field(&self, column: &str) -> Option<String> {
        let value = match column {
            "title" => self.title.clone(),
            "artist" => self.artist.clone(),
            "album" => self.album.clone(),
            "genre" => self.genre.clone(),
            "size" => self.size.to_string(),
            "seconds" => self.seconds.to_string(),
            "trackNumber" => self.track_number.to_string(),
            "trackCount" => self.track_count.to_string(),
            "year" => self.year.to_string(),
            "date" => self.date.clone(),
            "time" => self.time(),
            _ => return None,
        };
        Some(value)
    }
}

/// An ordered song catalog.
#[derive(Debug, Clone, Default)]
pub struct MusicLibrary {
    songs: Vec<Music>,
}

impl MusicLibrary {
    pub fn new(songs: Vec<Music>) -> Self {
        Self { songs }
    }

    pub fn builtin() -> Result<Self, FitError> {
        Self::from_tsv(BUILTIN_CATALOG)
    }

    /// Parses a tab-separated catalog. The first line is a header; blank
    /// lines are skipped.
    pub fn from_tsv(text: &str) -> Result<Self, FitError> {
        let songs = text
            .lines()
            .enumerate()
            .skip(1)
            .filter(|(_, line)| !line.trim().is_empty())
            .map(|(i, line)| {
                let fields: Vec<&str> = line.split('\t').collect();
                Music::from_fields(&fields, i + 1)
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { songs })
    }

    pub fn load(path: &Path) -> Result<Self, FitError> {
        let text = std::fs::read_to_string(path).map_err(|e| {
            err_msg!(Io, "Failed to read music catalog '{}'", path.display()).with_cause(e)
        })?;
        let library = Self::from_tsv(&text)?;
        log::info!("loaded {} song(s) from {}", library.songs.len(), path.display());
        Ok(library)
    }

    pub fn display_contents(&self) -> Vec<Music> {
        self.songs.clone()
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }
}

/// Shows the library's displayed songs as `eg.music.Music` rows.
pub struct Display {
    library: Arc<MusicLibrary>,
}

impl Display {
    pub fn new(library: Arc<MusicLibrary>) -> Self {
        Self { library }
    }
}

impl RowFixture for Display {
    fn target_shape(&self) -> TargetShape {
        TargetShape::new(MUSIC_TYPE, &COLUMNS)
    }

    fn query(&self) -> Vec<Box<dyn RowObject>> {
        self.library
            .display_contents()
            .into_iter()
            .map(|m| Box::new(m) as Box<dyn RowObject>)
            .collect()
    }
}
