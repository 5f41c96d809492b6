/// Something a command acts on, identified by `(prefix, name)`.
pub trait Target {
    fn name(&self) -> &str;

    fn prefix(&self) -> Option<&str>;

    fn prefix_mut(&mut self) -> &mut Option<String>;

    fn identity(&self) -> (Option<&str>, &str) {
        (self.prefix(), self.name())
    }

    /// Two targets are the same entity iff prefix and name match.
    fn same_entity(&self, other: &dyn Target) -> bool {
        self.identity() == other.identity()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub prefix: Option<String>,
    /// Whether `create` should add an `id bigserial primary key` column.
    pub primary_key: bool,
}

impl Table {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            primary_key: true,
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn without_primary_key(mut self) -> Self {
        self.primary_key = false;
        self
    }
}

impl Target for Table {
    fn name(&self) -> &str {
        &self.name
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn prefix_mut(&mut self) -> &mut Option<String> {
        &mut self.prefix
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    pub name: String,
    pub prefix: Option<String>,
    pub table: String,
    pub columns: Vec<String>,
    pub unique: bool,
    pub concurrently: bool,
}

impl Index {
    /// An index on `table` over `columns`, named `<table>_<columns>_index`.
    pub fn new<I, S>(table: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let table = table.into();
        let columns: Vec<String> = columns.into_iter().map(Into::into).collect();
        let name = format!("{}_{}_index", table, columns.join("_"));
        Self {
            name,
            prefix: None,
            table,
            columns,
            unique: false,
            concurrently: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn concurrently(mut self) -> Self {
        self.concurrently = true;
        self
    }
}

impl Target for Index {
    fn name(&self) -> &str {
        &self.name
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn prefix_mut(&mut self) -> &mut Option<String> {
        &mut self.prefix
    }
}

/// A named table constraint. Exactly one of `check` or `exclude` must be set
/// before it can be rendered.
#[derive(Debug, Clone, PartialEq)]
pub struct Constraint {
    pub name: String,
    pub prefix: Option<String>,
    pub table: String,
    pub check: Option<String>,
    pub exclude: Option<String>,
}

impl Constraint {
    pub fn new(table: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            prefix: None,
            table: table.into(),
            check: None,
            exclude: None,
        }
    }

    pub fn check(
        table: impl Into<String>,
        name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self::new(table, name).with_check(expression)
    }

    pub fn exclude(
        table: impl Into<String>,
        name: impl Into<String>,
        expression: impl Into<String>,
    ) -> Self {
        Self::new(table, name).with_exclude(expression)
    }

    pub fn with_check(mut self, expression: impl Into<String>) -> Self {
        self.check = Some(expression.into());
        self
    }

    pub fn with_exclude(mut self, expression: impl Into<String>) -> Self {
        self.exclude = Some(expression.into());
        self
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }
}

impl Target for Constraint {
    fn name(&self) -> &str {
        &self.name
    }

    fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    fn prefix_mut(&mut self) -> &mut Option<String> {
        &mut self.prefix
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_default_name() {
        let index = Index::new("users", ["email"]);
        assert_eq!(index.name, "users_email_index");

        let composite = Index::new("users", ["first_name", "last_name"]);
        assert_eq!(composite.name, "users_first_name_last_name_index");
    }

    #[test]
    fn index_name_override() {
        let index = Index::new("users", ["email"]).with_name("idx_email").unique();
        assert_eq!(index.name, "idx_email");
        assert!(index.unique);
        assert!(!index.concurrently);
    }

    #[test]
    fn builders_leave_accessors_callable_on_values() {
        let index = Index::new("users", ["email"])
            .with_name("idx_email")
            .with_prefix("public");
        assert_eq!(index.name(), "idx_email");
        assert_eq!(index.prefix(), Some("public"));

        let table = Table::new("users").with_prefix("public");
        assert_eq!(table.name(), "users");
        assert_eq!(table.prefix(), Some("public"));

        let constraint = Constraint::check("orders", "amount_positive", "amount > 0")
            .with_prefix("sales");
        assert_eq!(constraint.name(), "amount_positive");
        assert_eq!(constraint.prefix(), Some("sales"));
    }

    #[test]
    fn identity_is_prefix_and_name() {
        let a = Table::new("users").with_prefix("public");
        let b = Table::new("users").with_prefix("public").without_primary_key();
        let c = Table::new("users").with_prefix("archive");
        let d = Table::new("users");

        assert!(a.same_entity(&b));
        assert!(!a.same_entity(&c));
        assert!(!a.same_entity(&d));
    }

    #[test]
    fn identity_crosses_target_kinds() {
        let table = Table::new("users");
        let index = Index::new("users", ["email"]).with_name("users");
        assert!(table.same_entity(&index));
    }

    #[test]
    fn constraint_constructors() {
        let check = Constraint::check("orders", "amount_positive", "amount > 0");
        assert_eq!(check.check.as_deref(), Some("amount > 0"));
        assert!(check.exclude.is_none());

        let bare = Constraint::new("orders", "c");
        assert!(bare.check.is_none() && bare.exclude.is_none());
    }
}
