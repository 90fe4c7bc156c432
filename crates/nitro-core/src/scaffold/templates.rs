//! String templates for generated component files
//!
//! Every template is a pure function of the component name and flags.

use super::{ComponentName, FileKind};

/// Options that change how templates reference each other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TemplateFlags {
    /// A CSS module is generated alongside the UI component
    pub has_css_module: bool,
}

pub fn render(kind: FileKind, name: &ComponentName, flags: TemplateFlags) -> String {
    match kind {
        FileKind::DatoBlock => dato_block(name),
        FileKind::UiComponent => ui_component(name, flags),
        FileKind::CssModule => css_module(name),
        FileKind::GraphqlFragment => graphql_fragment(name),
        FileKind::StorybookStory => storybook_story(name),
    }
}

/// React component wrapping a DatoCMS record fragment
pub fn dato_block(name: &ComponentName) -> String {
    format!(
        r#"import {{ Dato }} from "@/graphql/dato/__generated__/types"

type DatoBlock{name}Props = {{ fragment: Dato.{name}Fragment }}

/**
 * Function description (JSDoc)
 */
export function DatoBlock{name}({{ fragment }}: DatoBlock{name}Props) {{

  return null
}}
"#
    )
}

pub fn ui_component(name: &ComponentName, flags: TemplateFlags) -> String {
    if flags.has_css_module {
        let module = name.lower_first();
        format!(
            r#"import styles from "./{module}.module.css"

export type {name}Props = {{}}

/**
 * Function description (JSDoc)
 */
export function {name}(props: {name}Props) {{
  return <div className={{styles.root}}></div>
}}
"#
        )
    } else {
        format!(
            r#"export type {name}Props = {{}}

/**
 * Function description (JSDoc)
 */
export function {name}(props: {name}Props) {{
  return null
}}
"#
        )
    }
}

pub fn css_module(_name: &ComponentName) -> String {
    ".root {\n}\n".to_string()
}

pub fn graphql_fragment(name: &ComponentName) -> String {
    format!(
        r#"fragment {name} on {name}Record {{
  __typename
}}
"#
    )
}

pub fn storybook_story(name: &ComponentName) -> String {
    format!(
        r#"import {{ Meta, StoryObj }} from '@storybook/react'
import {{ {name} }} from '../{name}'

const meta: Meta<typeof {name}> = {{
  title: 'ui/{name}',
  component: {name},
  tags: ["autodocs"],
}}

export default meta

type Story = StoryObj<typeof {name}>

export const Default: Story = {{
  args: {{

  }},
}}

Default.parameters = {{
  // viewport: {{
  //   defaultViewport: 'xs',
  // }},
  // layout: 'fullscreen',
}}
"#
    )
}
