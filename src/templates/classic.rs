//! Classic Professional – traditional single-column layout.
//!
//! Centered serif header under a heavy double rule, then full-width
//! sections in reading order. Skills and projects are set as balanced
//! tables, the way typeset CVs usually arrange them.

use crate::profile::ProfileData;
use crate::templates::{document, escape, page_style};
use crate::theme::ThemeConfig;

const MAX_EXPERIENCE: usize = 4;
const MAX_BULLETS: usize = 3;
const MAX_SKILL_GROUPS: usize = 6;
const MAX_PROJECTS: usize = 4;
/// Skill groups / projects per table row.
const COLUMNS_PER_ROW: usize = 3;
const PROJECT_COLUMNS: usize = 2;

pub fn render(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut body = format!("<div style=\"{}\">", page_style("35px 45px", "#ffffff"));

    body.push_str(&header(data, theme));
    body.push_str(&section(
        "Professional Summary",
        theme,
        &format!(
            "<p style=\"text-align:justify;color:#444444;line-height:1.7;font-size:10px;margin:0\">{}</p>",
            escape(&data.summary)
        ),
    ));
    body.push_str(&section("Professional Experience", theme, &experience(data, theme)));
    body.push_str(&section("Technical Skills", theme, &skills_table(data, theme)));
    body.push_str(&section("Notable Projects", theme, &projects_table(data, theme)));
    body.push_str(&section("Education", theme, &education(data, theme)));

    body.push_str("</div>");
    document(&format!("{} - CV", data.name), theme.font_family, &body)
}

fn header(data: &ProfileData, theme: &ThemeConfig) -> String {
    let contact: Vec<String> = [&data.email, &data.phone, &data.location, &data.linkedin]
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| {
            format!(
                "<span style=\"margin:0 8px\">{}</span>",
                escape(v)
            )
        })
        .collect();

    format!(
        "<div style=\"text-align:center;border-bottom:3px solid {secondary};\
         padding-bottom:18px;margin-bottom:20px\">\
         <div style=\"font-size:26px;font-weight:bold;color:{secondary};letter-spacing:2px;\
         margin-bottom:4px\">{name}</div>\
         <div style=\"font-size:13px;color:{primary};font-weight:bold;letter-spacing:1px;\
         margin-bottom:10px\">{title}</div>\
         <div style=\"font-size:9px;color:#555555\">{contact}</div>\
         </div>",
        secondary = theme.secondary_color,
        primary = theme.primary_color,
        name = escape(&data.name.to_uppercase()),
        title = escape(&data.title),
        contact = contact.join(""),
    )
}

fn section(label: &str, theme: &ThemeConfig, content: &str) -> String {
    format!(
        "<div style=\"margin-bottom:18px\">\
         <div style=\"font-size:12px;font-weight:bold;color:{secondary};letter-spacing:2px;\
         border-bottom:1px solid {accent};padding-bottom:4px;margin-bottom:10px\">{label}</div>\
         {content}\
         </div>",
        secondary = theme.secondary_color,
        accent = theme.accent_color,
        label = label.to_uppercase(),
        content = content,
    )
}

fn experience(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut s = String::new();
    for exp in data.experience.iter().take(MAX_EXPERIENCE) {
        s.push_str(&format!(
            "<div style=\"margin-bottom:14px\">\
             <table style=\"width:100%\"><tr>\
             <td style=\"font-weight:bold;font-size:11px;color:{secondary}\">{title}</td>\
             <td style=\"width:140px;text-align:right;font-size:9px;color:{primary};\
             font-style:italic\">{period}</td>\
             </tr></table>\
             <div style=\"color:#666666;font-size:10px;font-style:italic;margin-bottom:4px\">{company}, {location}</div>\
             <ul style=\"padding-left:18px;margin:0\">",
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
    s
}

fn skills_table(data: &ProfileData, theme: &ThemeConfig) -> String {
    let groups: Vec<&crate::profile::SkillGroup> =
        data.skills.iter().take(MAX_SKILL_GROUPS).collect();
    if groups.is_empty() {
        return String::new();
    }

    let mut s = String::from("<table style=\"width:100%\">");
    for row in groups.chunks(COLUMNS_PER_ROW) {
        s.push_str("<tr>");
        for group in row {
            s.push_str(&format!(
                "<td style=\"padding:0 10px 10px 0\">\
                 <div style=\"font-weight:bold;font-size:9px;color:{secondary};\
                 margin-bottom:3px;letter-spacing:0.5px\">{category}</div>\
                 <div style=\"font-size:9px;color:#555555;line-height:1.5\">{items}</div>\
                 </td>",
                secondary = theme.secondary_color,
                category = escape(&group.category.to_uppercase()),
                items = escape(&group.items.join(", ")),
            ));
        }
        s.push_str("</tr>");
    }
    s.push_str("</table>");
    s
}

fn projects_table(data: &ProfileData, theme: &ThemeConfig) -> String {
    let projects: Vec<&crate::profile::ProjectEntry> =
        data.projects.iter().take(MAX_PROJECTS).collect();
    if projects.is_empty() {
        return String::new();
    }

    let mut s = String::from("<table style=\"width:100%\">");
    for row in projects.chunks(PROJECT_COLUMNS) {
        s.push_str("<tr>");
        for proj in row {
            s.push_str(&format!(
                "<td style=\"padding:8px;border:1px solid #dddddd\">\
                 <div style=\"font-weight:bold;font-size:10px;color:{secondary};margin-bottom:3px\">{name}</div>\
                 <div style=\"font-size:8px;color:{primary};font-weight:bold;margin-bottom:3px\">{kind} Development</div>\
                 <div style=\"font-size:8px;color:#555555;line-height:1.4\">{desc}</div>\
                 </td>",
                secondary = theme.secondary_color,
                primary = theme.primary_color,
                name = escape(&proj.name),
                kind = proj.contribution.label(),
                desc = escape(&proj.description),
            ));
        }
        s.push_str("</tr>");
    }
    s.push_str("</table>");
    s
}

fn education(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut s = String::new();
    for edu in &data.education {
        s.push_str(&format!(
            "<div style=\"margin-bottom:4px\">\
             <div style=\"font-weight:bold;font-size:10px;color:{secondary}\">{degree}</div>\
             <div style=\"font-size:9px;color:#555555\">{institution} | {period}</div>\
             </div>",
            secondary = theme.secondary_color,
            degree = escape(&edu.degree),
            institution = escape(&edu.institution),
            period = escape(&edu.period),
        ));
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::default_profile;
    use crate::theme::resolve_theme;

    #[test]
    fn header_name_is_uppercased() {
        let markup = render(&default_profile(), resolve_theme("classic"));
        assert!(markup.contains("ELENA VASQUEZ"));
    }

    #[test]
    fn skill_groups_chunk_into_rows() {
        let profile = default_profile();
        let markup = render(&profile, resolve_theme("classic"));
        // Six groups at three per row gives two table rows.
        let rows = markup.matches("<tr>").count();
        assert!(rows >= 3, "expected header-free skill rows plus project rows, got {rows}");
    }
}
