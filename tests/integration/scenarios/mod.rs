mod common_endpoints;
mod count_cli;
mod paged_source;
