#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Height(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct Width(pub usize);

#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct RowIndex(pub usize);
#[derive(Eq, PartialEq, Copy, Clone, Debug)]
pub struct ColumnIndex(pub usize);
