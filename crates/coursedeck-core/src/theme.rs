//! Host theme applied as root custom properties

use coursedeck_bridge::ThemeParams;

use crate::surface::Surface;

/// Write every present color token. Returns how many were written.
pub fn apply_theme(surface: &dyn Surface, theme: &ThemeParams) -> usize {
    let vars = theme.style_vars();
    for (name, value) in &vars {
        surface.set_root_style_var(name, value);
    }

    tracing::debug!(vars = vars.len(), "Applied host theme");
    vars.len()
}
