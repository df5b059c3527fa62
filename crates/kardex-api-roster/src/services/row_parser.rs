//! Roster row parser.
//!
//! Turns raw delimited text into a lazy sequence of `CandidateRow`.
//! Pure: identical text yields an identical sequence, and calling
//! `candidate_rows` again restarts from scratch.

use crate::models::{CandidateRow, Delimiter};
use crate::validation::RosterColumns;

/// UTF-8 byte order mark, stripped if present.
const UTF8_BOM: char = '\u{feff}';

/// Parse roster text into candidate rows.
///
/// The header row is read once; column positions resolve case-insensitively
/// against the recognized vocabulary. Field splitting is purely positional
/// on the delimiter — no quoting or escaping. Blank lines are skipped, and
/// rows where given name, boleta, group label and email all resolve to the
/// empty string are excluded.
pub fn candidate_rows(text: &str, delimiter: Delimiter) -> impl Iterator<Item = CandidateRow> + '_ {
    let text = text.strip_prefix(UTF8_BOM).unwrap_or(text);

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .quoting(false)
        .delimiter(delimiter.as_byte())
        .from_reader(text.as_bytes());

    let columns = match reader.headers() {
        Ok(headers) => RosterColumns::resolve(headers.iter()),
        Err(_) => RosterColumns::default(),
    };

    reader.into_records().filter_map(move |record| {
        let record = record.ok()?;

        let field = |idx: Option<usize>| -> &str {
            idx.and_then(|i| record.get(i)).unwrap_or("").trim()
        };

        let given_name = field(columns.nombre);
        let paternal_surname = field(columns.apellido_paterno);
        let maternal_surname = field(columns.apellido_materno);
        let boleta = field(columns.boleta);
        let group_label = field(columns.grupo);
        let email = field(columns.email);

        if given_name.is_empty() && boleta.is_empty() && group_label.is_empty() && email.is_empty()
        {
            return None;
        }

        Some(CandidateRow {
            given_name: given_name.to_string(),
            paternal_surname: paternal_surname.to_string(),
            maternal_surname: maternal_surname.to_string(),
            boleta: boleta.to_string(),
            group_label: group_label.to_string(),
            email: email.to_string(),
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Vec<CandidateRow> {
        candidate_rows(text, Delimiter::Comma).collect()
    }

    #[test]
    fn test_parse_basic_roster() {
        let rows = parse(
            "nombre,apellido_paterno,apellido_materno,boleta,grupo,email\n\
             Ana,López,Mora,B001,3IM13,ana@example.com\n\
             Luis,Pérez,,B002,3IM13,\n",
        );
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].given_name, "Ana");
        assert_eq!(rows[0].paternal_surname, "López");
        assert_eq!(rows[0].boleta, "B001");
        assert_eq!(rows[0].group_label, "3IM13");
        assert_eq!(rows[0].email, "ana@example.com");
        assert_eq!(rows[1].maternal_surname, "");
        assert_eq!(rows[1].email, "");
    }

    #[test]
    fn test_parse_header_case_and_order_insensitive() {
        let rows = parse("GRUPO,Boleta,NOMBRE\n3IM13,B001,Ana\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].given_name, "Ana");
        assert_eq!(rows[0].boleta, "B001");
        assert_eq!(rows[0].group_label, "3IM13");
    }

    #[test]
    fn test_parse_correo_alias() {
        let rows = parse("nombre,boleta,grupo,correo\nAna,B001,3IM13,ana@example.com\n");
        assert_eq!(rows[0].email, "ana@example.com");
    }

    #[test]
    fn test_parse_missing_recognized_header_yields_empty_field() {
        let rows = parse("nombre,boleta,grupo\nAna,B001,3IM13\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].paternal_surname, "");
        assert_eq!(rows[0].email, "");
    }

    #[test]
    fn test_parse_unrecognized_headers_ignored() {
        let rows = parse("semestre,nombre,boleta,grupo\n5,Ana,B001,3IM13\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].given_name, "Ana");
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let rows = parse("nombre,boleta,grupo\n\nAna,B001,3IM13\n\n\nLuis,B002,3IM13\n");
        assert_eq!(rows.len(), 2);
    }

    #[test]
    fn test_parse_excludes_all_empty_rows() {
        let rows = parse("nombre,boleta,grupo,email\n,,,\nAna,B001,3IM13,\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].given_name, "Ana");
    }

    #[test]
    fn test_parse_keeps_partial_rows() {
        // Missing boleta: still a candidate, dropped later by the
        // deduplicator's precondition, not by the parser.
        let rows = parse("nombre,boleta,grupo\nAna,,3IM13\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].boleta, "");
    }

    #[test]
    fn test_parse_empty_and_header_only_input() {
        assert!(parse("").is_empty());
        assert!(parse("nombre,boleta,grupo\n").is_empty());
    }

    #[test]
    fn test_parse_strips_utf8_bom() {
        let rows = parse("\u{feff}nombre,boleta,grupo\nAna,B001,3IM13\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].given_name, "Ana");
    }

    #[test]
    fn test_parse_semicolon_delimiter() {
        let rows: Vec<CandidateRow> = candidate_rows(
            "nombre;boleta;grupo\nAna;B001;3IM13\n",
            Delimiter::Semicolon,
        )
        .collect();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].boleta, "B001");
    }

    #[test]
    fn test_parse_positional_splitting_ignores_quotes() {
        // Quoting is not part of the format: a quote is just a character.
        let rows = parse("nombre,boleta,grupo\n\"Ana,Maria\",B001,3IM13\n");
        assert_eq!(rows[0].given_name, "\"Ana");
        assert_eq!(rows[0].boleta, "Maria\"");
    }

    #[test]
    fn test_parse_trims_fields_and_crlf() {
        let rows = parse("nombre,boleta,grupo\r\n Ana , B001 , 3IM13 \r\n");
        assert_eq!(rows[0].given_name, "Ana");
        assert_eq!(rows[0].boleta, "B001");
        assert_eq!(rows[0].group_label, "3IM13");
    }

    #[test]
    fn test_parse_is_deterministic_and_restartable() {
        let text = "nombre,boleta,grupo\nAna,B001,3IM13\nLuis,B002,3IM14\n";
        let first = parse(text);
        let second = parse(text);
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_short_row_yields_empty_trailing_fields() {
        let rows = parse("nombre,boleta,grupo\nAna,B001\n");
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].group_label, "");
    }
}
