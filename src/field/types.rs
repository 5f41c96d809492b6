use std::fmt;

/// Column type as written by a migration author.
///
/// `Custom` passes a database-specific type through untouched.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnType {
    Serial,
    BigSerial,
    Integer,
    BigInt,
    SmallInt,
    Text,
    VarChar(usize),
    Boolean,
    Timestamp,
    TimestampTz,
    Date,
    Time,
    Uuid,
    Json,
    JsonB,
    Binary,
    Real,
    DoublePrecision,
    Decimal { precision: u8, scale: u8 },
    Custom(String),
}

impl ColumnType {
    pub fn custom(name: impl Into<String>) -> Self {
        ColumnType::Custom(name.into())
    }

    pub fn is_serial(&self) -> bool {
        matches!(self, ColumnType::Serial | ColumnType::BigSerial)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Serial => f.write_str("serial"),
            ColumnType::BigSerial => f.write_str("bigserial"),
            ColumnType::Integer => f.write_str("integer"),
            ColumnType::BigInt => f.write_str("bigint"),
            ColumnType::SmallInt => f.write_str("smallint"),
            ColumnType::Text => f.write_str("text"),
            ColumnType::VarChar(len) => write!(f, "varchar({})", len),
            ColumnType::Boolean => f.write_str("boolean"),
            ColumnType::Timestamp => f.write_str("timestamp"),
            ColumnType::TimestampTz => f.write_str("timestamptz"),
            ColumnType::Date => f.write_str("date"),
            ColumnType::Time => f.write_str("time"),
            ColumnType::Uuid => f.write_str("uuid"),
            ColumnType::Json => f.write_str("json"),
            ColumnType::JsonB => f.write_str("jsonb"),
            ColumnType::Binary => f.write_str("binary"),
            ColumnType::Real => f.write_str("real"),
            ColumnType::DoublePrecision => f.write_str("double precision"),
            ColumnType::Decimal { precision, scale } => {
                write!(f, "decimal({}, {})", precision, scale)
            }
            ColumnType::Custom(name) => f.write_str(name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decimal_displays_precision_and_scale() {
        let ty = ColumnType::Decimal {
            precision: 10,
            scale: 2,
        };
        assert_eq!(ty.to_string(), "decimal(10, 2)");
    }

    #[test]
    fn custom_type_passes_through() {
        assert_eq!(ColumnType::custom("citext").to_string(), "citext");
        assert_eq!(ColumnType::VarChar(255).to_string(), "varchar(255)");
    }

    #[test]
    fn serial_detection() {
        assert!(ColumnType::Serial.is_serial());
        assert!(ColumnType::BigSerial.is_serial());
        assert!(!ColumnType::Integer.is_serial());
    }
}
