//! Creative Timeline – header card plus a two-column body.
//!
//! The narrow left column stacks skills, projects, languages, and an
//! education card; the wide right column holds the summary and a vertical
//! experience timeline hanging off a colored rule.

use crate::profile::ProfileData;
use crate::templates::{document, escape, initials, page_style};
use crate::theme::ThemeConfig;

const MAX_EXPERIENCE: usize = 4;
/// Bullets folded into each timeline entry's running text.
const MAX_BULLETS: usize = 2;
const MAX_PROJECTS: usize = 5;
const MAX_SKILL_ITEMS: usize = 4;

pub fn render(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut body = format!("<div style=\"{}\">", page_style("30px", "#fafafa"));

    body.push_str(&header_card(data, theme));

    body.push_str("<table style=\"width:100%\"><tr>");
    body.push_str(&format!(
        "<td style=\"width:38%;padding-right:20px\">{}</td>",
        left_column(data, theme)
    ));
    body.push_str(&format!(
        "<td style=\"width:62%\">{}</td>",
        right_column(data, theme)
    ));
    body.push_str("</tr></table>");

    body.push_str("</div>");
    document(&format!("{} - CV", data.name), theme.font_family, &body)
}

fn header_card(data: &ProfileData, theme: &ThemeConfig) -> String {
    let contact: Vec<String> = [&data.email, &data.phone, &data.location, &data.linkedin]
        .iter()
        .filter(|v| !v.is_empty())
        .map(|v| escape(v))
        .collect();

    format!(
        "<div style=\"background:{secondary};border-radius:10px;color:#ffffff;\
         padding:20px 25px;margin-bottom:20px\">\
         <table style=\"width:100%\"><tr>\
         <td style=\"width:80px\">\
         <div style=\"width:70px;height:70px;background:{accent};border-radius:50%;\
         text-align:center;line-height:70px;font-size:24px;font-weight:bold;\
         color:{secondary}\">{init}</div></td>\
         <td style=\"padding-left:18px\">\
         <div style=\"font-size:22px;font-weight:bold;margin-bottom:2px\">{name}</div>\
         <div style=\"font-size:11px;color:{accent};margin-bottom:8px\">{title}</div>\
         <div style=\"font-size:8px;color:rgba(255,255,255,0.85);line-height:1.6\">{contact}</div>\
         </td></tr></table>\
         </div>",
        secondary = theme.secondary_color,
        accent = theme.accent_color,
        init = escape(&initials(&data.name)),
        name = escape(&data.name),
        title = escape(&data.title),
        contact = contact.join(" &nbsp;|&nbsp; "),
    )
}

fn left_column(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut s = String::new();

    s.push_str(&section_pill("Skills", theme));
    s.push_str("<div style=\"display:flex;flex-wrap:wrap;gap:3px\">");
    for group in &data.skills {
        for item in group.items.iter().take(MAX_SKILL_ITEMS) {
            s.push_str(&format!(
                "<span style=\"background:#ffffff;border:1px solid {primary};padding:4px 10px;\
                 border-radius:12px;font-size:8px;color:{secondary};font-weight:bold\">{item}</span>",
                primary = theme.primary_color,
                secondary = theme.secondary_color,
                item = escape(item),
            ));
        }
    }
    s.push_str("</div></div>");

    s.push_str(&section_pill("Projects", theme));
    for proj in data.projects.iter().take(MAX_PROJECTS) {
        s.push_str(&format!(
            "<div style=\"padding:10px;background:#ffffff;border:1px solid #eeeeee;\
             border-left:3px solid {primary};border-radius:6px;margin-bottom:8px\">\
             <div style=\"margin-bottom:3px;display:flex;gap:6px;align-items:center\">\
             <span style=\"font-weight:bold;font-size:10px;color:{secondary}\">{name}</span>\
             <span style=\"background:{accent};color:{secondary};padding:1px 6px;border-radius:8px;\
             font-size:7px;font-weight:bold\">{badge}</span></div>\
             <div style=\"font-size:8px;color:#666666\">{tech}</div>\
             </div>",
            primary = theme.primary_color,
            secondary = theme.secondary_color,
            accent = theme.accent_color,
            name = escape(&proj.name),
            badge = proj.contribution.label(),
            tech = escape(&proj.technologies),
        ));
    }
    s.push_str("</div>");

    s.push_str(&section_pill("Languages", theme));
    s.push_str("<div style=\"display:flex;flex-wrap:wrap;gap:4px\">");
    for lang in &data.languages {
        s.push_str(&format!(
            "<span style=\"background:#ffffff;padding:5px 10px;border-radius:6px;\
             border:1px solid #eeeeee;font-size:9px;color:{secondary}\">\
             {name} &#183; {level}</span>",
            secondary = theme.secondary_color,
            name = escape(&lang.name),
            level = escape(&lang.level),
        ));
    }
    s.push_str("</div></div>");

    s.push_str(&section_pill("Education", theme));
    for edu in &data.education {
        s.push_str(&format!(
            "<div style=\"background:#ffffff;border:1px solid #eeeeee;padding:12px;border-radius:8px;\
             text-align:center;margin-bottom:6px\">\
             <div style=\"font-weight:bold;font-size:10px;color:{secondary};margin-bottom:2px\">{degree}</div>\
             <div style=\"font-size:9px;color:#666666\">{institution}</div>\
             <div style=\"font-size:8px;color:{primary};font-weight:bold;margin-top:3px\">{period}</div>\
             </div>",
            secondary = theme.secondary_color,
            primary = theme.primary_color,
            degree = escape(&edu.degree),
            institution = escape(&edu.institution),
            period = escape(&edu.period),
        ));
    }
    s.push_str("</div>");

    s
}

fn right_column(data: &ProfileData, theme: &ThemeConfig) -> String {
    let mut s = String::new();

    s.push_str(&section_pill("About Me", theme));
    s.push_str(&format!(
        "<div style=\"font-size:10px;color:#555555;line-height:1.7;padding:12px;\
         background:#ffffff;border-radius:8px;border:1px solid #eeeeee\">{}</div></div>",
        escape(&data.summary)
    ));

    s.push_str(&section_pill("Experience Timeline", theme));
    s.push_str(&format!(
        "<div style=\"padding-left:15px;border-left:2px solid {primary}\">",
        primary = theme.primary_color
    ));
    for exp in data.experience.iter().take(MAX_EXPERIENCE) {
        let highlights: Vec<String> = exp
            .description
            .iter()
            .take(MAX_BULLETS)
            .map(|d| escape(d))
            .collect();
        let desc = if highlights.is_empty() {
            String::new()
        } else {
            format!("{}.", highlights.join(". "))
        };
        s.push_str(&format!(
            "<div style=\"margin-bottom:14px;padding:10px 12px;background:#ffffff;\
             border-radius:8px;border:1px solid #eeeeee\">\
             <div style=\"font-weight:bold;font-size:11px;color:{secondary};margin-bottom:2px\">{title}</div>\
             <div style=\"font-size:8px;color:{primary};margin-bottom:5px\">{company} &#8226; {period}</div>\
             <div style=\"font-size:8px;color:#666666;line-height:1.5\">{desc}</div>\
             </div>",
            secondary = theme.secondary_color,
            primary = theme.primary_color,
            title = escape(&exp.title),
            company = escape(&exp.company),
            period = escape(&exp.period),
            desc = desc,
        ));
    }
    s.push_str("</div></div>");

    s
}

/// Opens a section with a rounded colored label. Callers close the section
/// `</div>` after its body.
fn section_pill(label: &str, theme: &ThemeConfig) -> String {
    format!(
        "<div style=\"margin-bottom:18px\">\
         <div style=\"margin-bottom:10px;display:flex\">\
         <span style=\"background:{primary};color:#ffffff;padding:4px 12px;border-radius:12px;\
         font-size:10px;font-weight:bold\">{label}</span></div>",
        primary = theme.primary_color,
        label = label,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::default_profile;
    use crate::theme::resolve_theme;

    #[test]
    fn timeline_rule_wraps_experience() {
        let profile = default_profile();
        let markup = render(&profile, resolve_theme("creative"));
        assert!(markup.contains("border-left:2px solid"));
        assert!(markup.contains("Experience Timeline"));
    }

    #[test]
    fn sidebar_lists_projects_before_languages() {
        let profile = default_profile();
        let markup = render(&profile, resolve_theme("creative"));
        let projects = markup.find(">Projects<").unwrap();
        let languages = markup.find(">Languages<").unwrap();
        assert!(projects < languages);
    }
}
