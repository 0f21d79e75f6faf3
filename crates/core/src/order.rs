//! Sort order for query results.

/// Field a query result is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
	/// File name, lexicographic.
	Name,
	/// Time the file was added to the library.
	DateAdded,
	/// Last modification time on disk.
	DateModified,
	/// File size in bytes.
	Size,
}

/// Direction of a sort order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderDirection {
	/// Ascending.
	Asc,
	/// Descending.
	Desc,
}

/// Complete ordering of a file query.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FileOrder {
	/// Field to order by.
	pub by: OrderField,
	/// Direction to order in.
	pub direction: OrderDirection,
}

impl Default for FileOrder {
	fn default() -> Self {
		Self {
			by: OrderField::DateAdded,
			direction: OrderDirection::Desc,
		}
	}
}
