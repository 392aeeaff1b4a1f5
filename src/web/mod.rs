// Server-rendered pages (Askama templates, HTMX form submission)

pub mod handlers;
