//! Static page copy. Everything here is plain data; layout lives in `page`.

pub(crate) const BRAND: &str = "Faizaan.";
pub(crate) const BOOKING_URL: &str = "https://calendly.com/faizaan";

pub(crate) struct Stat {
    pub(crate) value: &'static str,
    pub(crate) label: &'static str,
}

pub(crate) struct CaseStudy {
    pub(crate) client: &'static str,
    pub(crate) url: Option<&'static str>,
    pub(crate) url2: Option<&'static str>,
    pub(crate) category: &'static str,
    pub(crate) result: &'static str,
    pub(crate) description: &'static str,
}

pub(crate) struct Collaborator {
    pub(crate) name: &'static str,
    pub(crate) initials: &'static str,
    pub(crate) url: &'static str,
}

pub(crate) struct Service {
    pub(crate) title: &'static str,
    pub(crate) tagline: &'static str,
    pub(crate) body: &'static str,
    pub(crate) bullets: &'static [&'static str],
}

pub(crate) struct SocialLink {
    pub(crate) label: &'static str,
    pub(crate) url: &'static str,
}

pub(crate) const HERO_KICKER: &str = "Founder Branding · Content Systems · Growth Strategy";
pub(crate) const HERO_HEADLINE: [&str; 2] = ["I turn founders into", "brands that compound."];
pub(crate) const HERO_BODY: &str = "I help founders and entrepreneurs build personal brands that \
attract deals, talent, and opportunities — through content systems, positioning, and marketing \
infrastructure engineered to scale.";

pub(crate) const STATS: [Stat; 3] = [
    Stat { value: "2.5B+", label: "Views generated" },
    Stat { value: "20+", label: "Content systems built" },
    Stat { value: "50+", label: "Brands transformed" },
];

pub(crate) const FEATURED_CASES: [CaseStudy; 7] = [
    CaseStudy {
        client: "Sam Zia",
        url: Some("https://www.instagram.com/samm_zia/"),
        url2: None,
        category: "Creator Growth",
        result: "197K → 700K Instagram followers",
        description: "Full-spectrum growth strategy including content repositioning, audience \
targeting, and engagement systems.",
    },
    CaseStudy {
        client: "Emerald Network",
        url: None,
        url2: None,
        category: "Faceless Media Empire",
        result: "~1B followers across platforms",
        description: "Built and managed a network of 20-30 faceless TikTok accounts in the \
conspiracy and esoteric knowledge niche. Created scalable content systems and SOPs that turned \
short-form content into a media machine.",
    },
    CaseStudy {
        client: "10X App / Blake Anderson",
        url: Some("https://www.instagram.com/10x/"),
        url2: None,
        category: "CMO / Brand Strategy",
        result: "Full brand & growth infrastructure",
        description: "Served as CMO and built the marketing infrastructure, content pipelines, and \
positioning strategy for a consumer app in the creator economy.",
    },
    CaseStudy {
        client: "Vibecode",
        url: Some("https://www.instagram.com/vibecodeapp/"),
        url2: None,
        category: "Launch Strategy",
        result: "10M views at launch",
        description: "Served as CMO and architected the launch content strategy from scratch. \
Built viral content loops and distribution systems that generated massive organic traction from \
day one.",
    },
    CaseStudy {
        client: "AST & Josh",
        url: Some("https://www.instagram.com/affinitysalestraining/"),
        url2: Some("https://www.instagram.com/joshtalksbiz/"),
        category: "Revenue & Content Growth",
        result: "5x revenue in 3 months · 2M views/month",
        description: "Built an in-house marketing team, doubled account following, revamped the \
brand, and ran the largest entrepreneur event in Ireland. Developed Josh's personal content \
strategy — pioneering formats that consistently hit 1M+ views per video.",
    },
    CaseStudy {
        client: "Paydai",
        url: Some("https://www.instagram.com/usepaydai/"),
        url2: None,
        category: "AI-First Marketing",
        result: "Pioneered AI-first campaigns",
        description: "Built and pioneered AI-first marketing campaigns from the ground up and \
trained a full in-house marketing team to scale execution independently.",
    },
    CaseStudy {
        client: "A Players Club / James Galligan",
        url: Some("https://www.instagram.com/aplayersclub/"),
        url2: Some("https://www.instagram.com/jamesgalligann/"),
        category: "Personal Brand",
        result: "Full brand transformation",
        description: "Consulted on personal brand positioning, visual aesthetic, and content \
direction — building a cohesive identity engineered for authority and inbound opportunities.",
    },
];

/// Card rows of the work grid: (start index, columns).
pub(crate) const CASE_ROWS: [(usize, usize); 3] = [(0, 3), (3, 2), (5, 2)];

pub(crate) const AVATAR_ROW: [Collaborator; 5] = [
    Collaborator { name: "Kinson La", initials: "KL", url: "https://www.instagram.com/buildyourecombrand/" },
    Collaborator { name: "TheTradingGeek", initials: "BG", url: "https://www.instagram.com/brad.goh/" },
    Collaborator { name: "Symone Beez", initials: "SB", url: "https://www.instagram.com/symonebeez/" },
    Collaborator { name: "Jimmy Farley", initials: "JF", url: "https://www.instagram.com/jimpapi/" },
    Collaborator { name: "AJ Currency", initials: "AJ", url: "https://www.instagram.com/aj.currency/" },
];

pub(crate) const SERVICES: [Service; 2] = [
    Service {
        title: "Founder Personal Branding",
        tagline: "Your business has revenue. Now build the brand behind it.",
        body: "End-to-end personal brand buildout for founders doing 6-8 figures. Positioning, \
content strategy, visual identity, audience growth, story sequences that convert, and systems \
that run without you. Designed to make you the face of your industry — attracting deals, talent, \
and opportunities on autopilot.",
        bullets: &[
            "Brand positioning & narrative",
            "Content strategy & systems",
            "Story sequence strategy",
            "Visual identity & aesthetic direction",
            "Audience growth frameworks",
        ],
    },
    Service {
        title: "Consulting & Advisory",
        tagline: "A strategist in your corner.",
        body: "High-level strategic consulting for founders who need clarity, direction, and a \
second brain. Every engagement starts with a tailored deep-dive into your brand — no templates, \
no fluff, just a roadmap built around your unfair advantages.",
        bullets: &[],
    },
];

pub(crate) const ABOUT_HEADLINE: [&str; 2] = [
    "The strategist founders call",
    "when they're ready to be seen.",
];

pub(crate) const ABOUT_PARAGRAPHS: [&str; 3] = [
    "I hold a Master's in Aerospace Engineering — but I've spent the last several years building \
personal brands, content empires, and marketing systems for founders and creators doing 6-8 \
figures.",
    "It started with sending 50 DMs a day offering editing services. It evolved into building a \
network of faceless accounts reaching a billion people, and serving as CMO for multiple companies \
across the creator economy.",
    "Today I work with founders who've built the business but haven't built the brand. I help them \
become the face of their industry — through personal brand positioning, content systems, \
story-driven sales strategies, and growth infrastructure that runs without them. Every engagement \
is tailored from scratch — no templates, no cookie-cutter frameworks.",
];

pub(crate) const SIDEBAR_FACTS: [&str; 4] = [
    "Master's in Aerospace Engineering",
    "2.5B+ organic reach built",
    "Consultant to 4 eight-figure brands",
    "Former CMO for Paydai, AST, 10X",
];

pub(crate) const CTA_HEADLINE: [&str; 2] = ["Ready to become the brand", "behind the business?"];
pub(crate) const CTA_BODY: &str = "Every engagement starts with a tailored deep-dive into your \
brand. No templates — just strategy built around your unfair advantages.";

pub(crate) const FOOTER_NOTE: &str = "© 2026 Faizaan · XYZA Strategies";

pub(crate) const SOCIALS: [SocialLink; 3] = [
    SocialLink { label: "Instagram", url: "https://www.instagram.com/onlyfyzn/" },
    SocialLink { label: "LinkedIn", url: "https://www.linkedin.com/in/faizaanbaig/" },
    SocialLink { label: "Twitter / X", url: "https://x.com/onlyfyzn" },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_rows_cover_every_case_once() {
        let mut next = 0;
        for (start, cols) in CASE_ROWS {
            assert_eq!(start, next);
            next += cols;
        }
        assert_eq!(next, FEATURED_CASES.len());
    }

    #[test]
    fn test_only_first_service_has_details() {
        assert!(!SERVICES[0].bullets.is_empty());
        assert!(SERVICES[1].bullets.is_empty());
    }
}
