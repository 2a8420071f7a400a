mod sql_hooks;
mod sql_request_template;
mod statement;

pub use sql_hooks::SqlHooks;
pub use sql_request_template::SqlRequestTemplate;
pub use statement::SqlStatement;
