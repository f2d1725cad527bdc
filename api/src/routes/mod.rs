pub mod ask_report_route;
pub mod explain_term_route;
pub mod health_route;
