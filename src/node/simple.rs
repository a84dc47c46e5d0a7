//! Enum alias (`simpleType`) rendering: the alias declaration, the literal
//! const block, the allowed-value list, and the checked `Set` helper.

use crate::gen::GenContext;
use crate::schema::error::GenResult;
use crate::schema::SimpleType;
use crate::util::upper_first;

pub(super) fn decl_line(s: &SimpleType) -> GenResult<String> {
    Ok(format!(
        "//{} {} //simple",
        upper_first(&s.name),
        s.restriction.base
    ))
}

/// Render the alias type, its literal consts and allowed-value list, and the
/// `Set` mutator. Idempotent per name. The literal named `CustomCode` is a
/// sentinel for values newer than the schema; it stays out of the const
/// block and the list except when it is the first literal.
pub(super) fn generate<'a>(s: &'a SimpleType, ctx: &mut GenContext<'a>) -> GenResult<()> {
    if ctx.enums.contains_key(&s.name) {
        return Ok(());
    }
    let raw = s.restriction.base.go_type_raw()?;
    let clean = upper_first(s.name.strip_suffix("CodeType").unwrap_or(&s.name));

    let mut decl = format!("type {} {}\r\n", s.name, raw);
    if raw == "string" {
        ctx.funcs.insert(
            s.name.clone(),
            format!(
                "func (x {0}) String() string {{ return string(x) }}\r\n",
                upper_first(&s.name)
            ),
        );
    }

    if !s.restriction.enumerations.is_empty() {
        decl.push_str("const (\r\n");
        let mut list = format!("var {}List = [...]string{{", upper_first(&s.name));
        for (i, lit) in s.restriction.enumerations.iter().enumerate() {
            if i == 0 {
                // First literal anchors the const block with an explicit type.
                decl.push_str(&format!(
                    "\t{}_{} {} = \"{}\"\r\n",
                    clean,
                    upper_first(&lit.value),
                    upper_first(&s.name),
                    lit.value
                ));
                list.push_str(&format!("\"{}\"", lit.value));
                continue;
            }
            if lit.value == "CustomCode" {
                continue;
            }
            list.push_str(&format!(",\"{}\"", lit.value));
            decl.push_str(&format!(
                "\t{}_{} = \"{}\"\r\n",
                clean,
                upper_first(&lit.value),
                lit.value
            ));
        }
        decl.push_str(")\r\n");
        list.push('}');
        ctx.funcs.insert(format!("{}List", s.name), list);

        let helper = format!(
            "func (x *{0}) Set(value string) error {{\r\n\
             \tif contains({0}List[:], value) {{\r\n\
             \t\t*x = {0}(value)\r\n\
             \t\treturn nil\r\n\
             \t}}\r\n\
             \treturn errors.New(\"invalid value for {0}\")\r\n\
             }}\r\n",
            upper_first(&s.name)
        );
        ctx.funcs.insert(format!("{}Helper", s.name), helper);
    }

    ctx.enums.insert(s.name.clone(), decl);
    Ok(())
}

/// Enum aliases carry no structural checks; a required alias leaves a
/// breadcrumb comment so the constraint stays visible in the output.
pub(super) fn validate(s: &SimpleType, ctx: &mut GenContext<'_>, call: &str, path: &str) {
    let required = s.annotation.as_ref().map_or(false, |a| a.required_for(call));
    if required {
        ctx.validator_mut(call)
            .push_str(&format!("//{}.{} // Simple: {}\r\n", path, s.name, call));
    }
}
