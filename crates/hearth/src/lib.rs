pub mod config;
pub mod devices;
pub mod events;
pub mod macros;
pub mod session;

pub mod gui {
    pub mod app;
    pub mod dashboard;
    pub mod dial;
    pub mod theme;
}

pub mod sys {
    pub mod runtime;
}
