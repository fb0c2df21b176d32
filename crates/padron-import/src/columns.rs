//! Header mapping and row parsing for voter spreadsheets.
//!
//! Recognized headers: `dni`, `last_name`, `first_name`, `sex`, `address`,
//! `mesa`, `orden`, `establishment`. Matching is case-insensitive and
//! ignores surrounding whitespace; unknown columns are ignored. The oldest
//! files carried a single `name` column, accepted as a stand-in for
//! `last_name` when neither name column is present.

use padron_core::entities::VoterDraft;

use crate::error::ImportError;

/// Column indexes resolved from a file's header row.
#[derive(Debug)]
pub(crate) struct ColumnMap {
    dni: usize,
    last_name: Option<usize>,
    first_name: Option<usize>,
    sex: Option<usize>,
    address: Option<usize>,
    mesa: Option<usize>,
    orden: Option<usize>,
    establishment: Option<usize>,
}

/// File-coordinate row number for a 0-based data index: 1-based plus the
/// header line, so the first data row is "Row 2".
pub(crate) const fn file_row(data_index: usize) -> usize {
    data_index + 2
}

fn field(record: &csv::StringRecord, idx: Option<usize>) -> Option<String> {
    idx.and_then(|i| record.get(i))
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(ToString::to_string)
}

impl ColumnMap {
    /// Resolve the recognized columns. The first occurrence of a duplicated
    /// header wins.
    ///
    /// # Errors
    ///
    /// `ImportError::Validation` when `dni` or every name column is absent.
    pub(crate) fn from_headers(headers: &csv::StringRecord) -> Result<Self, ImportError> {
        let mut dni = None;
        let mut last_name = None;
        let mut first_name = None;
        let mut sex = None;
        let mut address = None;
        let mut mesa = None;
        let mut orden = None;
        let mut establishment = None;
        let mut legacy_name = None;

        for (idx, raw) in headers.iter().enumerate() {
            match raw.trim().to_lowercase().as_str() {
                "dni" => dni = dni.or(Some(idx)),
                "last_name" => last_name = last_name.or(Some(idx)),
                "first_name" => first_name = first_name.or(Some(idx)),
                "sex" => sex = sex.or(Some(idx)),
                "address" => address = address.or(Some(idx)),
                "mesa" => mesa = mesa.or(Some(idx)),
                "orden" => orden = orden.or(Some(idx)),
                "establishment" => establishment = establishment.or(Some(idx)),
                "name" => legacy_name = legacy_name.or(Some(idx)),
                _ => {}
            }
        }

        if last_name.is_none() && first_name.is_none() {
            last_name = legacy_name;
        }

        let Some(dni) = dni else {
            return Err(ImportError::Validation(
                "File must contain a 'dni' column".to_string(),
            ));
        };
        if last_name.is_none() && first_name.is_none() {
            return Err(ImportError::Validation(
                "File must contain a 'last_name' or 'first_name' column".to_string(),
            ));
        }

        Ok(Self {
            dni,
            last_name,
            first_name,
            sex,
            address,
            mesa,
            orden,
            establishment,
        })
    }

    fn int_field(
        &self,
        record: &csv::StringRecord,
        idx: Option<usize>,
        column: &str,
        row_num: usize,
        warnings: &mut Vec<String>,
    ) -> Option<i64> {
        let raw = field(record, idx)?;
        match raw.parse::<i64>() {
            Ok(n) => Some(n),
            Err(_) => {
                warnings.push(format!("Row {row_num}: invalid {column} value '{raw}'; ignored"));
                None
            }
        }
    }

    /// Parse one data row into a draft.
    ///
    /// Returns `(None, warnings)` when the row must be skipped (missing DNI
    /// or both name fields). A row with an unparsable `mesa`/`orden` is kept
    /// with that field absent, plus a warning.
    pub(crate) fn parse_row(
        &self,
        record: &csv::StringRecord,
        data_index: usize,
    ) -> (Option<VoterDraft>, Vec<String>) {
        let row_num = file_row(data_index);
        let mut warnings = Vec::new();

        let dni = field(record, Some(self.dni));
        let last_name = field(record, self.last_name);
        let first_name = field(record, self.first_name);

        let Some(dni) = dni else {
            return (
                None,
                vec![format!("Row {row_num}: missing DNI or name; skipped")],
            );
        };
        if last_name.is_none() && first_name.is_none() {
            return (
                None,
                vec![format!("Row {row_num}: missing DNI or name; skipped")],
            );
        }

        let mesa = self.int_field(record, self.mesa, "mesa", row_num, &mut warnings);
        let orden = self.int_field(record, self.orden, "orden", row_num, &mut warnings);

        let draft = VoterDraft {
            dni,
            last_name: last_name.unwrap_or_default(),
            first_name: first_name.unwrap_or_default(),
            sex: field(record, self.sex),
            address: field(record, self.address),
            mesa,
            orden,
            establishment: field(record, self.establishment),
        };
        (Some(draft), warnings)
    }
}
