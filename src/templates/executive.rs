//! Executive Premium – banner header and boxed sections.
//!
//! A full-width banner on the secondary color opens the page, sections are
//! framed boxes with accent-square headers, and education closes the page
//! as a dark callout block.

use crate::profile::ProfileData;
use crate::templates::{document, escape, page_style};
use crate::theme::ThemeConfig;

const MAX_EXPERIENCE: usize = 3;
const MAX_BULLETS: usize = 2;
const MAX_SKILL_GROUPS: usize = 4;
const MAX_PROJECTS: usize = 4;

pub fn render(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut body = format!("<div style=\"{}\">", page_style("0", "#ffffff"));

    body.push_str(&banner(data, theme));
    body.push_str("<div style=\"padding:30px 40px\">");

    body.push_str(&section_header("*", "Executive Summary", theme));
    body.push_str(&format!(
        "<p style=\"font-size:10px;color:#444444;line-height:1.8;padding:15px;\
         background:#faf8f5;border-left:3px solid {accent};margin:0 0 22px 0\">{summary}</p>",
        accent = theme.accent_color,
        summary = escape(&data.summary),
    ));

    body.push_str(&section_header("+", "Professional Experience", theme));
    for exp in data.experience.iter().take(MAX_EXPERIENCE) {
        body.push_str(&format!(
            "<div style=\"margin-bottom:16px;padding:12px;background:#ffffff;border:1px solid #eeeeee\">\
             <table style=\"width:100%\"><tr>\
             <td style=\"font-weight:bold;font-size:11px;color:{secondary}\">{title}</td>\
             <td style=\"width:130px\">\
             <div style=\"display:flex;justify-content:flex-end\">\
             <span style=\"background:{accent};color:{secondary};padding:2px 8px;font-size:8px;\
             font-weight:bold\">{period}</span></div></td>\
             </tr></table>\
             <div style=\"color:{primary};font-size:10px;font-weight:bold;margin-bottom:6px\">{company} | {location}</div>",
            secondary = theme.secondary_color,
            primary = theme.primary_color,
            accent = theme.accent_color,
            title = escape(&exp.title),
            period = escape(&exp.period),
            company = escape(&exp.company),
            location = escape(&exp.location),
        ));
        for bullet in exp.description.iter().take(MAX_BULLETS) {
            body.push_str(&format!(
                "<div style=\"font-size:9px;color:#555555;margin-bottom:3px;padding-left:12px\">&#9670; {}</div>",
                escape(bullet)
            ));
        }
        body.push_str("</div>");
    }

    body.push_str(&section_header("=", "Core Competencies", theme));
    let groups: Vec<&crate::profile::SkillGroup> =
        data.skills.iter().take(MAX_SKILL_GROUPS).collect();
    if !groups.is_empty() {
        body.push_str("<table style=\"width:100%;margin-bottom:22px\">");
        for row in groups.chunks(2) {
            body.push_str("<tr>");
            for group in row {
                body.push_str(&format!(
                    "<td style=\"padding:10px;background:#faf8f5;border-bottom:2px solid {accent}\">\
                     <div style=\"font-weight:bold;font-size:9px;color:{secondary};margin-bottom:5px;\
                     letter-spacing:0.5px\">{category}</div>\
                     <div style=\"font-size:9px;color:#555555;line-height:1.6\">{items}</div>\
                     </td>",
                    accent = theme.accent_color,
                    secondary = theme.secondary_color,
                    category = escape(&group.category.to_uppercase()),
                    items = escape(&group.items.join(" \u{2022} ")),
                ));
            }
            body.push_str("</tr>");
        }
        body.push_str("</table>");
    }

    body.push_str(&section_header("#", "Key Projects", theme));
    let projects: Vec<&crate::profile::ProjectEntry> =
        data.projects.iter().take(MAX_PROJECTS).collect();
    if !projects.is_empty() {
        body.push_str("<table style=\"width:100%;margin-bottom:22px\">");
        for row in projects.chunks(2) {
            body.push_str("<tr>");
            for proj in row {
                body.push_str(&format!(
                    "<td style=\"padding:10px;border:1px solid #dddddd;border-left:3px solid {accent}\">\
                     <div style=\"font-weight:bold;font-size:10px;color:{secondary};margin-bottom:3px\">{name}</div>\
                     <div style=\"margin-bottom:5px;display:flex\"><span style=\"background:{secondary};\
                     color:{accent};padding:1px 6px;font-size:7px;font-weight:bold\">{badge}</span></div>\
                     <div style=\"font-size:8px;color:#666666;line-height:1.5\">{desc}</div>\
                     </td>",
                    accent = theme.accent_color,
                    secondary = theme.secondary_color,
                    name = escape(&proj.name),
                    badge = proj.contribution.label(),
                    desc = escape(&proj.description),
                ));
            }
            body.push_str("</tr>");
        }
        body.push_str("</table>");
    }

    // Closing education callout – only when there is something to say.
    if !data.education.is_empty() {
        body.push_str(&format!(
            "<div style=\"background:{secondary};color:#ffffff;padding:15px;text-align:center\">",
            secondary = theme.secondary_color
        ));
        for edu in &data.education {
            body.push_str(&format!(
                "<div style=\"font-size:12px;font-weight:bold;margin-bottom:3px\">{degree}</div>\
                 <div style=\"font-size:10px;color:{accent}\">{institution}</div>\
                 <div style=\"font-size:9px;color:rgba(255,255,255,0.7);margin-top:3px\">{period}</div>",
                accent = theme.accent_color,
                degree = escape(&edu.degree),
                institution = escape(&edu.institution),
                period = escape(&edu.period),
            ));
        }
        body.push_str("</div>");
    }

    body.push_str("</div></div>");
    document(&format!("{} - CV", data.name), theme.font_family, &body)
}

fn banner(data: &ProfileData, theme: &ThemeConfig) -> String {
    let contact: Vec<String> = [&data.email, &data.phone, &data.location]
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| format!("<span style=\"margin:0 12px\">{}</span>", escape(v)))
        .collect();

    format!(
        "<div style=\"background:{secondary};color:#ffffff;padding:30px 40px;text-align:center\">\
         <div style=\"font-size:26px;font-weight:bold;letter-spacing:3px;margin-bottom:6px\">{name}</div>\
         <div style=\"font-size:12px;color:{accent};letter-spacing:2px;margin-bottom:12px\">{title}</div>\
         <div style=\"font-size:9px;color:rgba(255,255,255,0.85)\">{contact}</div>\
         </div>",
        secondary = theme.secondary_color,
        accent = theme.accent_color,
        name = escape(&data.name.to_uppercase()),
        title = escape(&data.title.to_uppercase()),
        contact = contact.join(""),
    )
}

fn section_header(glyph: &str, label: &str, theme: &ThemeConfig) -> String {
    format!(
        "<div style=\"border-bottom:2px solid {accent};padding-bottom:6px;margin-bottom:12px;\
         display:flex;align-items:center;gap:8px\">\
         <span style=\"display:inline-block;width:22px;background:{accent};color:{secondary};\
         text-align:center;font-size:11px\">{glyph}</span>\
         <span style=\"font-size:13px;font-weight:bold;color:{secondary};letter-spacing:1px\">{label}</span>\
         </div>",
        accent = theme.accent_color,
        secondary = theme.secondary_color,
        glyph = glyph,
        label = label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::{default_profile, empty_profile};
    use crate::theme::resolve_theme;

    #[test]
    fn education_callout_closes_the_page() {
        let profile = default_profile();
        let markup = render(&profile, resolve_theme("executive"));
        let edu_pos = markup.find("B.Sc. in Computer Engineering").unwrap();
        let exp_pos = markup.find("Tideway Analytics").unwrap();
        assert!(edu_pos > exp_pos, "education block must come last");
    }

    #[test]
    fn no_callout_without_education() {
        let profile = empty_profile();
        let markup = render(&profile, resolve_theme("executive"));
        assert!(!markup.contains("text-align:center\"><div style=\"font-size:12px"));
    }

    #[test]
    fn experience_is_truncated_to_three() {
        let profile = default_profile();
        let markup = render(&profile, resolve_theme("executive"));
        assert!(markup.contains("Tideway Analytics"));
        assert!(markup.contains("Nimbus Salud"));
        assert!(!markup.contains("Estudio Brava"), "fourth entry must be cut");
    }
}
