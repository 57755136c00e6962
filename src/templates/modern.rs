//! Modern Sidebar – two-column layout.
//!
//! A colored sidebar column carries identity, contact details, skills, and
//! languages; the main column carries summary, experience, projects, and
//! education. Columns are a two-cell table, which both the layout engine
//! and word processors handle predictably.

use crate::profile::ProfileData;
use crate::templates::{document, escape, initials, page_style};
use crate::theme::ThemeConfig;

/// Prefix limits keeping the page to a single A4 sheet.
const MAX_EXPERIENCE: usize = 4;
const MAX_BULLETS: usize = 3;
const MAX_PROJECTS: usize = 5;
const MAX_SKILL_ITEMS: usize = 5;

pub fn render(data: &ProfileData, theme: &ThemeConfig) -> String {
    let sidebar = sidebar_column(data, theme);
    let main = main_column(data, theme);

    let body = format!(
        "<div style=\"{page}\">\
         <table style=\"width:100%\">\
         <tr>\
         <td style=\"width:220px;background:{secondary};color:#ffffff;padding:25px 18px\">{sidebar}</td>\
         <td style=\"background:#ffffff;padding:25px\">{main}</td>\
         </tr>\
         </table>\
         </div>",
        page = page_style("0", "#ffffff"),
        secondary = theme.secondary_color,
        sidebar = sidebar,
        main = main,
    );

    document(&format!("{} - CV", data.name), theme.font_family, &body)
}

fn sidebar_column(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut s = String::new();

    // Initials badge in place of a photo.
    s.push_str(&format!(
        "<div style=\"width:100px;height:100px;border-radius:50%;background:{accent};\
         margin:0 0 15px 60px;text-align:center;line-height:100px;font-size:32px;\
         font-weight:bold;color:#ffffff\">{init}</div>",
        accent = theme.accent_color,
        init = escape(&initials(&data.name)),
    ));
    s.push_str(&format!(
        "<div style=\"font-size:18px;text-align:center;font-weight:bold;margin-bottom:3px\">{}</div>",
        escape(&data.name)
    ));
    s.push_str(&format!(
        "<div style=\"text-align:center;color:{accent};font-size:11px;margin-bottom:20px\">{title}</div>",
        accent = theme.accent_color,
        title = escape(&data.title),
    ));

    // Contact
    s.push_str(&sidebar_heading("Contact", theme));
    for (tag, value) in [
        ("@", &data.email),
        ("T", &data.phone),
        ("L", &data.location),
        ("in", &data.linkedin),
        ("gh", &data.github),
    ] {
        if value.is_empty() {
            continue;
        }
        s.push_str(&format!(
            "<div style=\"margin-bottom:6px;font-size:9px;display:flex;gap:6px\">\
             <span style=\"display:inline-block;width:16px;background:{accent};text-align:center;\
             font-size:8px;border-radius:2px\">{tag}</span><span>{value}</span></div>",
            accent = theme.accent_color,
            tag = tag,
            value = escape(value),
        ));
    }
    s.push_str("</div>");

    // Skills
    s.push_str(&sidebar_heading("Skills", theme));
    for group in &data.skills {
        s.push_str(&format!(
            "<div style=\"margin-bottom:10px\">\
             <div style=\"font-size:9px;font-weight:bold;margin-bottom:3px\">{}</div>\
             <div style=\"display:flex;flex-wrap:wrap;gap:3px\">",
            escape(&group.category)
        ));
        for item in group.items.iter().take(MAX_SKILL_ITEMS) {
            s.push_str(&format!(
                "<span style=\"background:rgba(255,255,255,0.15);padding:2px 5px;\
                 border-radius:2px;font-size:8px\">{}</span>",
                escape(item)
            ));
        }
        s.push_str("</div></div>");
    }
    s.push_str("</div>");

    // Languages
    s.push_str(&sidebar_heading("Languages", theme));
    for lang in &data.languages {
        s.push_str(&format!(
            "<div style=\"font-size:9px;margin-bottom:4px\">{} - {}</div>",
            escape(&lang.name),
            escape(&lang.level)
        ));
    }
    s.push_str("</div>");

    s
}

/// Opens a sidebar section: a bordered uppercase heading followed by the
/// section body. Callers close the wrapping `</div>` themselves.
fn sidebar_heading(label: &str, theme: &ThemeConfig) -> String {
    format!(
        "<div style=\"margin-bottom:18px\">\
         <div style=\"font-size:10px;letter-spacing:1.5px;border-bottom:1px solid {accent};\
         padding-bottom:4px;margin-bottom:10px;color:{accent};font-weight:bold\">{label}</div>",
        accent = theme.accent_color,
        label = label.to_uppercase(),
    )
}

fn main_column(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut s = String::new();

    s.push_str(&section_title("Professional Summary", theme, true));
    s.push_str(&format!(
        "<p style=\"color:#444444;line-height:1.6;font-size:10px;margin:0\">{}</p>",
        escape(&data.summary)
    ));

    s.push_str(&section_title("Experience", theme, false));
    for exp in data.experience.iter().take(MAX_EXPERIENCE) {
        s.push_str(&format!(
            "<div style=\"margin-bottom:14px\">\
             <table style=\"width:100%\"><tr>\
             <td style=\"font-weight:bold;font-size:11px;color:{secondary}\">{title}</td>\
             <td style=\"width:140px;text-align:right;font-size:9px;color:{primary};font-weight:bold\">{period}</td>\
             </tr></table>\
             <div style=\"color:#666666;font-size:10px;margin-bottom:4px\">{company} &#8226; {location}</div>\
             <ul style=\"padding-left:15px;margin:0\">",
            secondary = theme.secondary_color,
            primary = theme.primary_color,
            title = escape(&exp.title),
            period = escape(&exp.period),
            company = escape(&exp.company),
            location = escape(&exp.location),
        ));
        for bullet in exp.description.iter().take(MAX_BULLETS) {
            s.push_str(&format!(
                "<li style=\"margin-bottom:2px;color:#555555;font-size:9px\">{}</li>",
                escape(bullet)
            ));
        }
        s.push_str("</ul></div>");
    }

    s.push_str(&section_title("Key Projects", theme, false));
    for (i, proj) in data.projects.iter().take(MAX_PROJECTS).enumerate() {
        let divider = if i + 1 < data.projects.len().min(MAX_PROJECTS) {
            "border-bottom:1px solid #eeeeee;"
        } else {
            ""
        };
        s.push_str(&format!(
            "<div style=\"margin-bottom:10px;padding-bottom:8px;{divider}\">\
             <div style=\"display:flex;gap:6px;align-items:center\">\
             <span style=\"font-weight:bold;color:{secondary};font-size:10px\">{name}</span>\
             <span style=\"background:{primary};color:#ffffff;padding:1px 5px;border-radius:2px;\
             font-size:7px\">{badge}</span></div>\
             <div style=\"color:#555555;font-size:9px;margin:2px 0\">{desc}</div>\
             <div style=\"font-size:8px;color:{primary}\">{tech}</div>\
             </div>",
            divider = divider,
            secondary = theme.secondary_color,
            primary = theme.primary_color,
            name = escape(&proj.name),
            badge = proj.contribution.label(),
            desc = escape(&proj.description),
            tech = escape(&proj.technologies),
        ));
    }

    s.push_str(&section_title("Education", theme, false));
    for edu in &data.education {
        s.push_str(&format!(
            "<div style=\"margin-bottom:6px\">\
             <div style=\"font-weight:bold;color:{secondary};font-size:10px\">{degree}</div>\
             <div style=\"color:#555555;font-size:9px\">{institution}</div>\
             <div style=\"color:{primary};font-size:9px\">{period}</div>\
             </div>",
            secondary = theme.secondary_color,
            primary = theme.primary_color,
            degree = escape(&edu.degree),
            institution = escape(&edu.institution),
            period = escape(&edu.period),
        ));
    }

    s
}

fn section_title(label: &str, theme: &ThemeConfig, first: bool) -> String {
    let margin_top = if first { 0 } else { 18 };
    format!(
        "<div style=\"font-size:13px;color:{secondary};letter-spacing:1.5px;\
         border-bottom:2px solid {primary};padding-bottom:4px;margin-bottom:12px;\
         margin-top:{top}px;font-weight:bold\">{label}</div>",
        secondary = theme.secondary_color,
        primary = theme.primary_color,
        top = margin_top,
        label = label.to_uppercase(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::default_profile;
    use crate::theme::resolve_theme;

    #[test]
    fn sidebar_and_main_column_present() {
        let markup = render(&default_profile(), resolve_theme("modern"));
        assert!(markup.contains("width:220px"));
        assert!(markup.contains("PROFESSIONAL SUMMARY"));
        assert!(markup.contains("LANGUAGES"));
    }

    #[test]
    fn experience_is_a_prefix() {
        let profile = default_profile();
        let markup = render(&profile, resolve_theme("modern"));
        for exp in profile.experience.iter().take(MAX_EXPERIENCE) {
            assert!(markup.contains(&escape(&exp.title)));
        }
    }
}
