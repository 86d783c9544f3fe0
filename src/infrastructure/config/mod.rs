mod xdg;

pub use xdg::XdgConfigStore;
