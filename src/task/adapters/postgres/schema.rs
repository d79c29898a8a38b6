//! Diesel schema for task persistence.

diesel::table! {
    /// Task records keyed by store-assigned identifier.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Stable owner identifier.
        #[max_length = 255]
        owner -> Varchar,
        /// Numeric priority rank (1 = most urgent, 4 = least).
        priority -> SmallInt,
        /// Lifecycle status.
        #[max_length = 50]
        status -> Varchar,
        /// Creation timestamp; the fairness key for promotion ordering.
        created_on -> Timestamptz,
        /// Optional target date (unused by the engine).
        due_date -> Nullable<Timestamptz>,
        /// Completion timestamp, set when the task reaches `done`.
        completed_on -> Nullable<Timestamptz>,
    }
}
