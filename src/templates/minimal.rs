//! Minimal Clean – single-column layout built around whitespace.
//!
//! A light header, a short accent divider, then sparse sections: each
//! experience entry hangs off a left accent rule, skills collapse into one
//! flat row of pill tags, projects sit in a quiet two-column table.

use crate::profile::ProfileData;
use crate::templates::{document, escape, page_style};
use crate::theme::ThemeConfig;

const MAX_EXPERIENCE: usize = 4;
const MAX_BULLETS: usize = 2;
const MAX_PROJECTS: usize = 6;
/// Items surfaced per skill category before flattening into the pill row.
const MAX_SKILL_ITEMS: usize = 5;

pub fn render(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut body = format!("<div style=\"{}\">", page_style("45px 55px", "#ffffff"));

    // Header
    let contact: Vec<String> = [&data.email, &data.phone, &data.location, &data.linkedin]
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| format!("<span style=\"margin-right:15px\">{}</span>", escape(v)))
        .collect();
    body.push_str(&format!(
        "<div style=\"margin-bottom:25px\">\
         <div style=\"font-size:28px;font-weight:bold;color:{secondary};margin-bottom:3px\">{name}</div>\
         <div style=\"font-size:13px;color:{accent};margin-bottom:12px\">{title}</div>\
         <div style=\"font-size:9px;color:#666666\">{contact}</div>\
         </div>\
         <div style=\"width:40px;height:3px;background:{primary};margin-bottom:22px\"></div>",
        secondary = theme.secondary_color,
        accent = theme.accent_color,
        primary = theme.primary_color,
        name = escape(&data.name),
        title = escape(&data.title),
        contact = contact.join(""),
    ));

    // Summary – untitled, the whitespace is the frame.
    body.push_str(&format!(
        "<div style=\"margin-bottom:22px\">\
         <p style=\"font-size:11px;color:#444444;line-height:1.7;margin:0\">{}</p>\
         </div>",
        escape(&data.summary)
    ));

    body.push_str(&section_title("Experience", theme));
    for exp in data.experience.iter().take(MAX_EXPERIENCE) {
        body.push_str(&format!(
            "<div style=\"margin-bottom:16px;padding-left:12px;border-left:3px solid {primary}\">\
             <div style=\"font-size:12px;font-weight:bold;color:{secondary};margin-bottom:2px\">{title}</div>\
             <div style=\"font-size:9px;color:{accent};margin-bottom:6px\">{company} &#183; {location} &#183; {period}</div>",
            primary = theme.primary_color,
            secondary = theme.secondary_color,
            accent = theme.accent_color,
            title = escape(&exp.title),
            company = escape(&exp.company),
            location = escape(&exp.location),
            period = escape(&exp.period),
        ));
        for bullet in exp.description.iter().take(MAX_BULLETS) {
            body.push_str(&format!(
                "<div style=\"font-size:9px;color:#555555;margin-bottom:3px\">&#8212; {}</div>",
                escape(bullet)
            ));
        }
        body.push_str("</div>");
    }
    body.push_str("</div>");

    body.push_str(&section_title("Skills", theme));
    body.push_str("<div style=\"display:flex;flex-wrap:wrap;gap:4px\">");
    for group in &data.skills {
        for item in group.items.iter().take(MAX_SKILL_ITEMS) {
            body.push_str(&format!(
                "<span style=\"background:#f5f5f5;padding:3px 10px;border-radius:12px;\
                 font-size:9px;color:#444444\">{}</span>",
                escape(item)
            ));
        }
    }
    body.push_str("</div></div>");

    body.push_str(&section_title("Projects", theme));
    let projects: Vec<&crate::profile::ProjectEntry> =
        data.projects.iter().take(MAX_PROJECTS).collect();
    if !projects.is_empty() {
        body.push_str("<table style=\"width:100%\">");
        for row in projects.chunks(2) {
            body.push_str("<tr>");
            for proj in row {
                body.push_str(&format!(
                    "<td style=\"padding:0 15px 8px 0\">\
                     <div style=\"font-weight:bold;font-size:10px;color:{secondary}\">{name}</div>\
                     <div style=\"font-size:8px;color:#666666\">{tech}</div>\
                     </td>",
                    secondary = theme.secondary_color,
                    name = escape(&proj.name),
                    tech = escape(&proj.technologies),
                ));
            }
            body.push_str("</tr>");
        }
        body.push_str("</table>");
    }
    body.push_str("</div>");

    body.push_str(&section_title("Education", theme));
    for edu in &data.education {
        body.push_str(&format!(
            "<div style=\"margin-bottom:8px\">\
             <span style=\"font-weight:bold;font-size:10px;color:{secondary}\">{degree}</span>\
             <span style=\"font-size:9px;color:#666666;margin-left:8px\">{institution} &#183; {period}</span>\
             </div>",
            secondary = theme.secondary_color,
            degree = escape(&edu.degree),
            institution = escape(&edu.institution),
            period = escape(&edu.period),
        ));
    }
    body.push_str("</div>");

    body.push_str("</div>");
    document(&format!("{} - CV", data.name), theme.font_family, &body)
}

/// Opens a section: a small tracked-out label. Callers close the wrapping
/// `</div>` after the section body.
fn section_title(label: &str, theme: &ThemeConfig) -> String {
    format!(
        "<div style=\"margin-bottom:22px\">\
         <div style=\"font-size:9px;font-weight:bold;color:{primary};letter-spacing:2px;\
         margin-bottom:12px\">{label}</div>",
        primary = theme.primary_color,
        label = label.to_uppercase(),
    )
}
