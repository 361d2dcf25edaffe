//! Agent personas for the two pipeline stages.

use crate::brief::{Content, SiteBrief};

/// An agent identity: who it is and what it is trying to achieve.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Short role name used in logs, e.g. "content-writer".
    pub role: String,
    pub goal: String,
    pub backstory: String,
}

impl Agent {
    /// System prompt sent with every request this agent makes.
    pub fn system_prompt(&self) -> String {
        format!(
            "You are a {}.\n\nYour goal: {}\n\nBackground: {}",
            self.role.replace('-', " "),
            self.goal,
            self.backstory
        )
    }
}

pub fn content_writer() -> Agent {
    Agent {
        role: "content-writer".to_string(),
        goal: "Write engaging and effective web content".to_string(),
        backstory: "Professional content writer specializing in web copy. \
                    Experienced in creating compelling headlines, clear value \
                    propositions, and persuasive calls-to-action."
            .to_string(),
    }
}

pub fn web_designer() -> Agent {
    Agent {
        role: "web-designer".to_string(),
        goal: "Create beautiful and functional static websites".to_string(),
        backstory: "Expert web designer with years of experience in creating \
                    modern, responsive websites. Skilled in HTML, CSS, and \
                    design principles."
            .to_string(),
    }
}

/// Task prompt for the content stage.
pub fn content_task(brief: &SiteBrief) -> String {
    format!(
        "Write compelling content for a {business} website.\n\
         Key features to highlight: {features}\n\
         \n\
         Return the content in this format:\n\
         HERO_TITLE:\n\
         HERO_SUBTITLE:\n\
         FEATURE1_TITLE:\n\
         FEATURE1_DESCRIPTION:\n\
         [continue for all features]\n\
         CONTACT_BLURB:\n\
         CALL_TO_ACTION:",
        business = brief.business_type,
        features = brief.key_features,
    )
}

/// Task prompt for the design stage. Embeds the writer's copy verbatim.
pub fn design_task(brief: &SiteBrief, content: &Content) -> String {
    format!(
        "Create a modern, responsive static website for a {business}.\n\
         Style preferences: {style}\n\
         The site should include:\n\
         - Navigation bar\n\
         - Hero section\n\
         - Features section with: {features}\n\
         - Contact section\n\
         - Footer\n\
         \n\
         Use this website copy, written by the content writer:\n\
         ---\n\
         {copy}\n\
         ---\n\
         \n\
         Return only the complete HTML code with embedded CSS, \
         inside a single ```html code block.",
        business = brief.business_type,
        style = brief.style_preference,
        features = brief.key_features,
        copy = content.raw,
    )
}
