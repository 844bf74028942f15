//! Static tenant resources: letter templates, state legal resources and
//! emergency contacts.

/// Template kinds served by [`document_template`].
pub const TEMPLATE_KINDS: [&str; 3] = ["repair_request", "notice_to_vacate", "deposit_demand"];

const REPAIR_REQUEST: &str = "\
**Repair Request Letter Template**

[Date]

[Landlord Name]
[Landlord Address]

Dear [Landlord Name],

I am writing to formally request repairs to my rental unit at [Property Address], Unit [Number].

**Issues requiring attention:**
• [Describe issue 1 in detail]
• [Describe issue 2 in detail]

These issues affect the habitability of the property and require prompt attention. Please arrange for repairs within a reasonable timeframe as required by law.

I am available to provide access to the unit. Please contact me at [Phone] or [Email] to schedule.

Thank you for your prompt attention to this matter.

Sincerely,
[Your Name]
[Date]

**Keep a copy for your records**
";

const NOTICE_TO_VACATE: &str = "\
**Notice to Vacate Template**

[Date]

[Landlord Name]
[Landlord Address]

Dear [Landlord Name],

This letter serves as my formal [30/60] day notice to vacate the rental property located at [Property Address], Unit [Number].

**Move-out Details:**
• Last day of occupancy: [Date]
• Final rent payment through: [Date]
• Forwarding address: [New Address]

I request to schedule a pre-move-out inspection and will ensure the property is returned in good condition, normal wear and tear excepted.

Please return my security deposit of $[Amount] to my forwarding address within the timeframe required by law.

Thank you for your cooperation.

Sincerely,
[Your Name]
[Current Date]
";

const DEPOSIT_DEMAND: &str = "\
**Security Deposit Return Demand Letter**

[Date]

[Landlord Name]
[Landlord Address]

Dear [Landlord Name],

I am writing to formally request the return of my security deposit for the property at [Property Address], which I vacated on [Move-out Date].

**Deposit Details:**
• Amount paid: $[Amount]
• Date paid: [Date]
• Days since move-out: [Number]

According to [State] law, security deposits must be returned within [timeframe] days. As this period has passed, I am requesting immediate return of my full deposit.

If deductions were made, please provide an itemized list with receipts as required by law. I believe I am entitled to the full amount as the property was left in good condition.

Please send the deposit to: [Forwarding Address]

I expect resolution within [timeframe] or I may pursue legal remedies available under state law.

Sincerely,
[Your Name]
[Date]
";

/// Letter template for `kind`, or `None` for an unknown kind.
pub fn find_template(kind: &str) -> Option<&'static str> {
    match kind {
        "repair_request" => Some(REPAIR_REQUEST),
        "notice_to_vacate" => Some(NOTICE_TO_VACATE),
        "deposit_demand" => Some(DEPOSIT_DEMAND),
        _ => None,
    }
}

/// Letter template for `kind`; unknown kinds get a message listing the
/// available templates.
pub fn document_template(kind: &str) -> String {
    match find_template(kind) {
        Some(template) => template.to_string(),
        None => format!(
            "Template not found. Available templates: {}",
            TEMPLATE_KINDS.join(", ")
        ),
    }
}

struct StateResources {
    housing_authority: &'static str,
    tenant_org: &'static str,
    legal_aid: &'static str,
    hotline: &'static str,
}

fn state_resources(key: &str) -> Option<StateResources> {
    let resources = match key {
        "california" => StateResources {
            housing_authority: "California Department of Housing and Community Development",
            tenant_org: "Tenants Together",
            legal_aid: "California Legal Aid",
            hotline: "1-866-557-7368",
        },
        "new_york" => StateResources {
            housing_authority: "New York State Division of Housing",
            tenant_org: "Met Council on Housing",
            legal_aid: "Legal Aid Society",
            hotline: "311",
        },
        "texas" => StateResources {
            housing_authority: "Texas Department of Housing",
            tenant_org: "Texas Tenants Union",
            legal_aid: "Texas Legal Aid",
            hotline: "2-1-1",
        },
        _ => return None,
    };
    Some(resources)
}

/// Lookup key for a state name: trimmed, lowercased, whitespace folded to `_`.
fn state_key(state: &str) -> String {
    state
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("_")
}

/// Title-cased display name ("new_york" and "NEW YORK" both give "New York").
fn state_title(state: &str) -> String {
    state
        .split(|c: char| c.is_whitespace() || c == '_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first
                    .to_uppercase()
                    .chain(chars.flat_map(char::to_lowercase))
                    .collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Tenant legal resources for a US state.
///
/// California, New York and Texas have dedicated entries; any other state
/// gets general pointers naming it.
pub fn legal_resources(state: &str) -> String {
    let title = state_title(state);
    if let Some(r) = state_resources(&state_key(state)) {
        return format!(
            "**{title} Tenant Resources:**\n\n\
             • **Housing Authority:** {}\n\
             • **Tenant Organization:** {}\n\
             • **Legal Aid:** {}\n\
             • **Hotline:** {}\n\n\
             **Additional Resources:**\n\
             • Search \"[your city] tenant rights\" for local organizations\n\
             • Contact your city hall for housing department information\n\
             • Check state bar association for lawyer referrals\n",
            r.housing_authority, r.tenant_org, r.legal_aid, r.hotline
        );
    }

    let plain = state.trim();
    format!(
        "**General Resources for {title}:**\n\n\
         • Contact your state housing authority\n\
         • Search \"tenant rights {plain}\" online\n\
         • Call 2-1-1 for local resource referrals\n\
         • Contact state legal aid organizations\n\
         • Check with your city's housing department\n\n\
         **For specific {title} laws:**\n\
         • Visit your state government website\n\
         • Contact state attorney general's office\n\
         • Look up \"{plain} landlord tenant law\"\n"
    )
}

/// Emergency help for tenants, with a local section when a location is known.
pub fn emergency_resources(location: Option<&str>) -> String {
    let mut lines: Vec<String> = vec![
        "\u{1f6a8} **Emergency Tenant Resources**\n".to_string(),
        "**Immediate Help:**".to_string(),
        "• Contact local housing authority".to_string(),
        "• Reach out to tenant rights organizations".to_string(),
        "• Call 211 for local resource referrals".to_string(),
        "• Contact legal aid societies for free legal help".to_string(),
        String::new(),
    ];

    match location.map(str::trim).filter(|l| !l.is_empty()) {
        Some(location) => {
            lines.push(format!("**{}-Specific Resources:**", location));
            lines.push("• Search '[your city] tenant rights organization'".to_string());
            lines.push("• Look up '[your state] housing authority'".to_string());
            lines.push("• Contact '[your area] legal aid'".to_string());
        }
        None => {
            lines.push("**How to Find Local Help:**".to_string());
            lines.push("• Search 'tenant rights [your city]'".to_string());
            lines.push("• Contact your city's housing department".to_string());
            lines.push("• Look up state tenant protection agencies".to_string());
        }
    }

    lines.push(String::new());
    lines.push("**If facing illegal eviction or harassment:**".to_string());
    lines.push("• Document everything (photos, messages, recordings if legal)".to_string());
    lines.push("• File complaints with housing authorities".to_string());
    lines.push("• Seek immediate legal representation".to_string());
    lines.push("• Know that self-help evictions are illegal in most places".to_string());

    lines.join("\n")
}
