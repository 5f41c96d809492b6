mod types;

pub use types::ColumnType;

/// Options attached to a column change.
///
/// `from` is only meaningful on a modify: it records what the column looked
/// like before, which is what makes the modify reversible.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnOptions {
    pub null: Option<bool>,
    pub default: Option<String>,
    pub primary_key: bool,
    pub unique: bool,
    pub references: Option<ForeignKey>,
    pub from: Option<ModifyFrom>,
}

/// Prior state of a modified column.
#[derive(Debug, Clone, PartialEq)]
pub enum ModifyFrom {
    Type(ColumnType),
    TypeWithOptions(ColumnType, Box<ColumnOptions>),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ForeignKey {
    pub table: String,
    pub column: String,
    pub on_delete: ReferentialAction,
    pub on_update: ReferentialAction,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum ReferentialAction {
    #[default]
    NoAction,
    Restrict,
    Cascade,
    SetNull,
    SetDefault,
}

impl ColumnOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_null(mut self) -> Self {
        self.null = Some(false);
        self
    }

    pub fn nullable(mut self) -> Self {
        self.null = Some(true);
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self.null = Some(false);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default = Some(value.into());
        self
    }

    pub fn references(mut self, table: impl Into<String>, column: impl Into<String>) -> Self {
        self.references = Some(ForeignKey {
            table: table.into(),
            column: column.into(),
            on_delete: ReferentialAction::default(),
            on_update: ReferentialAction::default(),
        });
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        if let Some(ref mut fk) = self.references {
            fk.on_delete = action;
        }
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        if let Some(ref mut fk) = self.references {
            fk.on_update = action;
        }
        self
    }

    /// Record the column's previous type.
    pub fn from_type(mut self, previous: ColumnType) -> Self {
        self.from = Some(ModifyFrom::Type(previous));
        self
    }

    /// Record the column's previous type together with its previous options.
    pub fn from_type_with(mut self, previous: ColumnType, options: ColumnOptions) -> Self {
        self.from = Some(ModifyFrom::TypeWithOptions(previous, Box::new(options)));
        self
    }

    /// A copy of these options with the `from` key dropped.
    pub fn without_from(&self) -> Self {
        Self {
            from: None,
            ..self.clone()
        }
    }
}

impl ReferentialAction {
    pub fn as_sql(&self) -> &'static str {
        match self {
            ReferentialAction::NoAction => "NO ACTION",
            ReferentialAction::Restrict => "RESTRICT",
            ReferentialAction::Cascade => "CASCADE",
            ReferentialAction::SetNull => "SET NULL",
            ReferentialAction::SetDefault => "SET DEFAULT",
        }
    }
}
