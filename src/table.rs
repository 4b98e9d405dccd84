//! Comma-delimited tables for WER results.
//!
//! Fields containing the delimiter, quotes, or newlines are quoted with
//! doubled inner quotes, so transcript text survives a round trip.

use std::path::Path;

use crate::error::{AppError, AppResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.header.iter().position(|column| column == name)
    }
}

pub fn render(header: &[String], rows: &[Vec<String>]) -> String {
    let mut out = String::new();
    push_row(&mut out, header);
    for row in rows {
        push_row(&mut out, row);
    }
    out
}

pub fn write_table(path: &Path, header: &[String], rows: &[Vec<String>]) -> AppResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, render(header, rows))?;
    Ok(())
}

pub fn read_table(path: &Path) -> AppResult<Table> {
    let raw = std::fs::read_to_string(path)?;
    parse(&raw)
}

pub fn parse(raw: &str) -> AppResult<Table> {
    let mut records = parse_records(raw)?;
    if records.is_empty() {
        return Err(AppError::Table("empty table".to_owned()));
    }

    let header = records.remove(0);
    for (index, row) in records.iter().enumerate() {
        if row.len() != header.len() {
            return Err(AppError::Table(format!(
                "row {} has {} fields, header has {}",
                index + 1,
                row.len(),
                header.len()
            )));
        }
    }

    Ok(Table {
        header,
        rows: records,
    })
}

fn push_row(out: &mut String, fields: &[String]) {
    for (index, field) in fields.iter().enumerate() {
        if index > 0 {
            out.push(',');
        }
        if needs_quoting(field) {
            out.push('"');
            out.push_str(&field.replace('"', "\"\""));
            out.push('"');
        } else {
            out.push_str(field);
        }
    }
    out.push('\n');
}

fn needs_quoting(field: &str) -> bool {
    field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r')
}

fn parse_records(raw: &str) -> AppResult<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = raw.chars().peekable();

    while let Some(ch) = chars.next() {
        if in_quotes {
            match ch {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(ch),
            }
            continue;
        }

        match ch {
            '"' => {
                if field.is_empty() {
                    in_quotes = true;
                } else {
                    return Err(AppError::Table(
                        "quote inside unquoted field".to_owned(),
                    ));
                }
            }
            ',' => {
                fields.push(std::mem::take(&mut field));
            }
            '\n' => {
                finish_record(&mut records, &mut fields, &mut field);
            }
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
                finish_record(&mut records, &mut fields, &mut field);
            }
            _ => field.push(ch),
        }
    }

    if in_quotes {
        return Err(AppError::Table("unterminated quoted field".to_owned()));
    }
    if !field.is_empty() || !fields.is_empty() {
        fields.push(field);
        records.push(fields);
    }

    Ok(records)
}

fn finish_record(records: &mut Vec<Vec<String>>, fields: &mut Vec<String>, field: &mut String) {
    // A bare newline between records is not a one-field row.
    if fields.is_empty() && field.is_empty() {
        return;
    }
    fields.push(std::mem::take(field));
    records.push(std::mem::take(fields));
}
