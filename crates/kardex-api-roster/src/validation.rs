//! Roster header resolution.
//!
//! Maps roster column headers to field positions against the fixed
//! recognized vocabulary. Matching is case-insensitive on trimmed header
//! names; unrecognized headers are ignored and missing recognized headers
//! simply leave their position unresolved.

/// Recognized roster column names.
///
/// `correo` is an accepted alias for `email`.
pub const ROSTER_COLUMNS: &[&str] = &[
    "nombre",
    "apellido_paterno",
    "apellido_materno",
    "boleta",
    "grupo",
    "email",
    "correo",
];

/// Resolved 0-based column positions for one roster file.
///
/// `None` means the header row did not carry that column; every row then
/// yields the empty string for the field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RosterColumns {
    pub nombre: Option<usize>,
    pub apellido_paterno: Option<usize>,
    pub apellido_materno: Option<usize>,
    pub boleta: Option<usize>,
    pub grupo: Option<usize>,
    pub email: Option<usize>,
}

impl RosterColumns {
    /// Resolve column positions from a header row.
    ///
    /// The first occurrence of each recognized header wins.
    #[must_use]
    pub fn resolve<'a, I>(headers: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut columns = Self::default();

        for (idx, header) in headers.into_iter().enumerate() {
            let normalized = header.trim().to_lowercase();
            match normalized.as_str() {
                "nombre" => columns.nombre.get_or_insert(idx),
                "apellido_paterno" => columns.apellido_paterno.get_or_insert(idx),
                "apellido_materno" => columns.apellido_materno.get_or_insert(idx),
                "boleta" => columns.boleta.get_or_insert(idx),
                "grupo" => columns.grupo.get_or_insert(idx),
                "email" | "correo" => columns.email.get_or_insert(idx),
                _ => continue,
            };
        }

        columns
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_all_columns() {
        let columns = RosterColumns::resolve([
            "nombre",
            "apellido_paterno",
            "apellido_materno",
            "boleta",
            "grupo",
            "email",
        ]);
        assert_eq!(columns.nombre, Some(0));
        assert_eq!(columns.apellido_paterno, Some(1));
        assert_eq!(columns.apellido_materno, Some(2));
        assert_eq!(columns.boleta, Some(3));
        assert_eq!(columns.grupo, Some(4));
        assert_eq!(columns.email, Some(5));
    }

    #[test]
    fn test_resolve_is_case_insensitive_and_trims() {
        let columns = RosterColumns::resolve(["  Nombre ", "BOLETA", "Grupo"]);
        assert_eq!(columns.nombre, Some(0));
        assert_eq!(columns.boleta, Some(1));
        assert_eq!(columns.grupo, Some(2));
    }

    #[test]
    fn test_resolve_accepts_correo_alias() {
        let columns = RosterColumns::resolve(["boleta", "correo"]);
        assert_eq!(columns.email, Some(1));
    }

    #[test]
    fn test_resolve_ignores_unrecognized_headers() {
        let columns = RosterColumns::resolve(["matricula", "nombre", "semestre"]);
        assert_eq!(columns.nombre, Some(1));
        assert_eq!(columns.boleta, None);
    }

    #[test]
    fn test_resolve_first_occurrence_wins() {
        let columns = RosterColumns::resolve(["nombre", "nombre", "email", "correo"]);
        assert_eq!(columns.nombre, Some(0));
        assert_eq!(columns.email, Some(2));
    }

    #[test]
    fn test_missing_columns_stay_unresolved() {
        let columns = RosterColumns::resolve(["nombre", "boleta", "grupo"]);
        assert_eq!(columns.apellido_paterno, None);
        assert_eq!(columns.apellido_materno, None);
        assert_eq!(columns.email, None);
    }
}
