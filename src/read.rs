use crate::data::{Error, Membership, ROW_FIELDS};
use std::path::Path;

/// Trait for doing something with a `Membership` read from a CSV file.
/// Implemented by the aggregator, and by `Vec` so that a whole file can be
/// materialized before any date gets converted.
pub trait MembershipUser {
    fn use_membership(&mut self, membership: Membership) -> Result<(), Error>;
}

impl MembershipUser for Vec<Membership> {
    fn use_membership(&mut self, membership: Membership) -> Result<(), Error> {
        self.push(membership);
        Ok(())
    }
}

/// What a physical line of the input is: the start of a record, or a blank
/// line. Lines inside a quoted field that runs over several lines are neither.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Line {
    Record(u64),
    Blank(u64),
}

/// Walks the input the way the CSV parser does, tracking quoted fields so a
/// newline inside quotes doesn't count as a new line of input.
fn scan_lines(text: &str) -> Vec<Line> {
    let mut lines = Vec::new();
    let mut in_quotes = false;
    for (number, line) in (1..).zip(text.lines()) {
        if !in_quotes {
            lines.push(if line.is_empty() {
                Line::Blank(number)
            } else {
                Line::Record(number)
            });
        }
        let mut field_start = !in_quotes;
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '"' if in_quotes => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                    } else {
                        in_quotes = false;
                    }
                }
                '"' if field_start => in_quotes = true,
                _ => {}
            }
            field_start = !in_quotes && c == ',';
        }
    }
    lines
}

/// CSV importer for `Membership`s. The first line is a header and is dropped
/// whatever it contains; every other line must have exactly 8 fields, and a
/// blank line counts as a row with none.
pub fn read_memberships<R: std::io::Read, U: MembershipUser>(
    mut reader: R,
    user: &mut U,
) -> Result<(), Error> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;
    // The parser skips blank lines on its own, so they are found beforehand
    // and lined up with the records it returns.
    let mut lines = scan_lines(&text).into_iter();
    let header_is_record = matches!(lines.next(), Some(Line::Record(_)));
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(text.as_bytes());
    let mut records = rdr.records().skip(usize::from(header_is_record));
    for line in lines {
        let line = match line {
            Line::Blank(line) => return Err(Error::MalformedRow { line, fields: 0 }),
            Line::Record(line) => line,
        };
        let Some(result) = records.next() else {
            break;
        };
        let record = result?;
        if record.len() != ROW_FIELDS {
            return Err(Error::MalformedRow {
                line,
                fields: record.len(),
            });
        }
        let membership: Membership = record.deserialize(None)?;
        user.use_membership(membership)?;
    }
    Ok(())
}

/// Reads the whole file into memory. The file is closed before this returns.
pub fn load<P: AsRef<Path>>(path: P) -> Result<Vec<Membership>, Error> {
    let path = path.as_ref();
    let file = std::fs::File::open(path)?;
    let mut memberships = Vec::new();
    read_memberships(file, &mut memberships)?;
    tracing::debug!(path = %path.display(), rows = memberships.len(), "loaded memberships");
    Ok(memberships)
}

#[cfg(test)]
mod tests {
    use crate::{
        data::{membership, Error},
        read::{load, read_memberships, scan_lines, Line},
    };

    #[test]
    fn read_rows() {
        let players_csv = b"\
player,team,startday,startmonth,startyear,endday,endmonth,endyear
Alice,TeamA,1,1,1400,10,1,1400
Alice,TeamB,11,1,1400,20,1,1400
Bob,TeamA,5,3,1401,5,3,1401
";
        let mut rows = Vec::new();
        read_memberships(&players_csv[..], &mut rows).unwrap();
        assert_eq!(
            rows,
            [
                membership("Alice", "TeamA", [1, 1, 1400], [10, 1, 1400]),
                membership("Alice", "TeamB", [11, 1, 1400], [20, 1, 1400]),
                membership("Bob", "TeamA", [5, 3, 1401], [5, 3, 1401]),
            ]
        );
    }

    #[test]
    fn header_is_not_checked() {
        let players_csv = b"\
whatever
Alice,TeamA,1,1,1400,10,1,1400
";
        let mut rows = Vec::new();
        read_memberships(&players_csv[..], &mut rows).unwrap();
        assert_eq!(
            rows,
            [membership("Alice", "TeamA", [1, 1, 1400], [10, 1, 1400])]
        );
    }

    #[test]
    fn header_only() {
        let mut rows = Vec::new();
        read_memberships(&b"player,team\n"[..], &mut rows).unwrap();
        assert!(rows.is_empty());
        read_memberships(&b""[..], &mut rows).unwrap();
        assert!(rows.is_empty());
    }

    #[test]
    fn names_are_not_trimmed() {
        let players_csv = b"\
player,team,startday,startmonth,startyear,endday,endmonth,endyear
\"Ali Daei\", Persepolis,1,1,1400,10,1,1400
";
        let mut rows = Vec::new();
        read_memberships(&players_csv[..], &mut rows).unwrap();
        assert_eq!(rows[0].player, "Ali Daei");
        assert_eq!(rows[0].team, " Persepolis");
    }

    #[test]
    fn numbers_are_trimmed() {
        let players_csv = b"\
player,team,startday,startmonth,startyear,endday,endmonth,endyear
Alice,TeamA, 1,1 ,1400, 10 ,1,1400
";
        let mut rows = Vec::new();
        read_memberships(&players_csv[..], &mut rows).unwrap();
        assert_eq!(
            rows,
            [membership("Alice", "TeamA", [1, 1, 1400], [10, 1, 1400])]
        );
    }

    #[test]
    fn blank_line() {
        let players_csv = b"\
player,team,startday,startmonth,startyear,endday,endmonth,endyear
Alice,TeamA,1,1,1400,10,1,1400

Bob,TeamA,1,1,1400,10,1,1400
";
        let mut rows = Vec::new();
        assert!(matches!(
            read_memberships(&players_csv[..], &mut rows),
            Err(Error::MalformedRow { line: 3, fields: 0 })
        ));
    }

    #[test]
    fn trailing_blank_line() {
        let players_csv = b"h\r\nAlice,TeamA,1,1,1400,10,1,1400\r\n\r\n";
        let mut rows = Vec::new();
        assert!(matches!(
            read_memberships(&players_csv[..], &mut rows),
            Err(Error::MalformedRow { line: 3, fields: 0 })
        ));
    }

    #[test]
    fn blank_first_line_is_the_header() {
        let players_csv = b"\nAlice,TeamA,1,1,1400,10,1,1400\n";
        let mut rows = Vec::new();
        read_memberships(&players_csv[..], &mut rows).unwrap();
        assert_eq!(
            rows,
            [membership("Alice", "TeamA", [1, 1, 1400], [10, 1, 1400])]
        );
    }

    #[test]
    fn quoted_newlines() {
        let players_csv = b"\
\"multi
line\",header
\"Ali

Daei\",\"Team \"\"A\"\"\",1,1,1400,10,1,1400
Bob,TeamA,1,1,1400,10,1
";
        assert_eq!(
            scan_lines(std::str::from_utf8(players_csv).unwrap()),
            [Line::Record(1), Line::Record(3), Line::Record(6)]
        );
        let mut rows = Vec::new();
        assert!(matches!(
            read_memberships(&players_csv[..], &mut rows),
            Err(Error::MalformedRow { line: 6, fields: 7 })
        ));
        assert_eq!(rows[0].player, "Ali\n\nDaei");
        assert_eq!(rows[0].team, "Team \"A\"");
    }

    #[test]
    fn short_row() {
        let players_csv = b"\
player,team,startday,startmonth,startyear,endday,endmonth,endyear
Alice,TeamA,1,1,1400,10,1,1400
Bob,TeamA,1,1,1400,10,1
";
        let mut rows = Vec::new();
        assert!(matches!(
            read_memberships(&players_csv[..], &mut rows),
            Err(Error::MalformedRow { line: 3, fields: 7 })
        ));
    }

    #[test]
    fn long_row() {
        let players_csv = b"\
player,team,startday,startmonth,startyear,endday,endmonth,endyear
Alice,TeamA,1,1,1400,10,1,1400,extra
";
        let mut rows = Vec::new();
        assert!(matches!(
            read_memberships(&players_csv[..], &mut rows),
            Err(Error::MalformedRow { line: 2, fields: 9 })
        ));
    }

    #[test]
    fn non_integer_field() {
        let players_csv = b"\
player,team,startday,startmonth,startyear,endday,endmonth,endyear
Alice,TeamA,first,1,1400,10,1,1400
";
        let mut rows = Vec::new();
        assert!(matches!(
            read_memberships(&players_csv[..], &mut rows),
            Err(Error::Csv(_))
        ));
    }

    #[test]
    fn missing_file() {
        assert!(matches!(
            load("this/file/does/not/exist.csv"),
            Err(Error::Io(_))
        ));
    }
}
