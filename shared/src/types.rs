/// Workspace-wide fallible result for glue code.
pub type Result<T> = anyhow::Result<T>;
