mod banner;
mod footer;
mod grid;
mod layout;
mod popup;
mod tabstrip;

pub(crate) use banner::render_banner;
pub(crate) use footer::render_footer;
pub(crate) use grid::render_grid;
pub(crate) use popup::render_option_popup;
