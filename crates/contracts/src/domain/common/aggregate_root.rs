use super::EntityMetadata;

/// Aggregate root contract
///
/// Every aggregate exposes its id and lifecycle metadata, plus static naming
/// used for table names, log lines and UI captions.
pub trait AggregateRoot {
    type Id;

    fn id(&self) -> Self::Id;

    fn metadata(&self) -> &EntityMetadata;

    fn metadata_mut(&mut self) -> &mut EntityMetadata;

    /// Index of the aggregate in the system (e.g. "a001")
    fn aggregate_index() -> &'static str;

    /// Collection name (e.g. "department")
    fn collection_name() -> &'static str;

    /// Singular UI caption
    fn element_name() -> &'static str;

    /// Plural UI caption
    fn list_name() -> &'static str;

    /// Full system name, also the table name (e.g. "a001_department")
    fn full_name() -> String {
        format!("{}_{}", Self::aggregate_index(), Self::collection_name())
    }
}
