//! Scalar coercion: input scalar → reflect value of a field's runtime type.
//!
//! The protobuf runtime panics when handed a value of the wrong type, so the
//! checks a setter would perform happen here and come back as a reason
//! string. Integers must fit the target width; floats accept integers; enums
//! accept a value name or a number. Closed (proto2) enums only take declared
//! numbers.

use crate::resolver::describe_runtime_type;
use crate::value::InputValue;
use protobuf::reflect::{EnumDescriptor, FileDescriptor, ReflectValueBox, RuntimeType, Syntax};

/// Coerce `value` into a `ReflectValueBox` of type `ty`.
///
/// `scope` is the file of the message being populated; enum types declared
/// there or in its dependencies are looked up in it to learn their syntax.
pub fn to_reflect_value(
    value: &InputValue,
    ty: &RuntimeType,
    scope: &FileDescriptor,
) -> Result<ReflectValueBox, String> {
    match ty {
        RuntimeType::I32 => int_value(value, ty).and_then(|i| {
            i32::try_from(i)
                .map(ReflectValueBox::I32)
                .map_err(|_| out_of_range(value, ty))
        }),
        RuntimeType::I64 => int_value(value, ty).and_then(|i| {
            i64::try_from(i)
                .map(ReflectValueBox::I64)
                .map_err(|_| out_of_range(value, ty))
        }),
        RuntimeType::U32 => int_value(value, ty).and_then(|i| {
            u32::try_from(i)
                .map(ReflectValueBox::U32)
                .map_err(|_| out_of_range(value, ty))
        }),
        RuntimeType::U64 => int_value(value, ty).and_then(|i| {
            u64::try_from(i)
                .map(ReflectValueBox::U64)
                .map_err(|_| out_of_range(value, ty))
        }),
        RuntimeType::F32 => float_value(value, ty).map(|x| ReflectValueBox::F32(x as f32)),
        RuntimeType::F64 => float_value(value, ty).map(ReflectValueBox::F64),
        RuntimeType::Bool => match value {
            InputValue::Bool(b) => Ok(ReflectValueBox::Bool(*b)),
            other => Err(mismatch(other, ty)),
        },
        RuntimeType::String => match value {
            InputValue::String(s) => Ok(ReflectValueBox::String(s.clone())),
            other => Err(mismatch(other, ty)),
        },
        RuntimeType::VecU8 => match value {
            InputValue::String(s) => Ok(ReflectValueBox::Bytes(s.as_bytes().to_vec())),
            other => Err(mismatch(other, ty)),
        },
        RuntimeType::Enum(descriptor) => enum_value(value, descriptor, scope),
        RuntimeType::Message(descriptor) => Err(format!(
            "expected a mapping for message {}, got {}",
            descriptor.full_name(),
            value.kind()
        )),
    }
}

/// Parse a map key (always a string in the input) into the map's key type.
pub fn map_key(key: &str, ty: &RuntimeType) -> Result<ReflectValueBox, String> {
    let parse_error = || format!("map key {key:?} is not a valid {}", describe_runtime_type(ty));
    match ty {
        RuntimeType::String => Ok(ReflectValueBox::String(key.to_string())),
        RuntimeType::I32 => key.parse().map(ReflectValueBox::I32).map_err(|_| parse_error()),
        RuntimeType::I64 => key.parse().map(ReflectValueBox::I64).map_err(|_| parse_error()),
        RuntimeType::U32 => key.parse().map(ReflectValueBox::U32).map_err(|_| parse_error()),
        RuntimeType::U64 => key.parse().map(ReflectValueBox::U64).map_err(|_| parse_error()),
        RuntimeType::Bool => key.parse().map(ReflectValueBox::Bool).map_err(|_| parse_error()),
        other => Err(format!(
            "{} is not a valid map key type",
            describe_runtime_type(other)
        )),
    }
}

fn int_value(value: &InputValue, ty: &RuntimeType) -> Result<i128, String> {
    match value {
        InputValue::Int(i) => Ok(i128::from(*i)),
        InputValue::UInt(u) => Ok(i128::from(*u)),
        other => Err(mismatch(other, ty)),
    }
}

fn float_value(value: &InputValue, ty: &RuntimeType) -> Result<f64, String> {
    match value {
        InputValue::Float(x) => Ok(*x),
        InputValue::Int(i) => Ok(*i as f64),
        InputValue::UInt(u) => Ok(*u as f64),
        other => Err(mismatch(other, ty)),
    }
}

fn enum_value(
    value: &InputValue,
    descriptor: &EnumDescriptor,
    scope: &FileDescriptor,
) -> Result<ReflectValueBox, String> {
    let number = match value {
        InputValue::String(name) => descriptor
            .value_by_name(name)
            .map(|v| v.value())
            .ok_or_else(|| {
                format!(
                    "unknown value {name:?} for enum {}",
                    descriptor.full_name()
                )
            })?,
        InputValue::Int(_) | InputValue::UInt(_) => {
            let ty = RuntimeType::Enum(descriptor.clone());
            let number = int_value(value, &ty)
                .and_then(|i| i32::try_from(i).map_err(|_| out_of_range(value, &ty)))?;
            if descriptor.value_by_number(number).is_none() && is_closed(descriptor, scope) {
                return Err(format!(
                    "unknown value {number} for enum {}",
                    descriptor.full_name()
                ));
            }
            number
        }
        other => return Err(mismatch(other, &RuntimeType::Enum(descriptor.clone()))),
    };
    Ok(ReflectValueBox::Enum(descriptor.clone(), number))
}

/// Enums declared in proto2 files are closed.
fn is_closed(descriptor: &EnumDescriptor, scope: &FileDescriptor) -> bool {
    let syntax = match descriptor.enclosing_message() {
        Some(message) => Some(message.file_descriptor().syntax()),
        None => declaring_file(descriptor, scope).map(|file| file.syntax()),
    };
    syntax == Some(Syntax::Proto2)
}

fn declaring_file(descriptor: &EnumDescriptor, scope: &FileDescriptor) -> Option<FileDescriptor> {
    if scope.enums().any(|e| e.full_name() == descriptor.full_name()) {
        return Some(scope.clone());
    }
    scope
        .deps()
        .iter()
        .find_map(|dep| declaring_file(descriptor, dep))
}

fn mismatch(value: &InputValue, ty: &RuntimeType) -> String {
    format!(
        "expected {}, got {} {}",
        describe_runtime_type(ty),
        value.kind(),
        value
    )
}

fn out_of_range(value: &InputValue, ty: &RuntimeType) -> String {
    format!("{value} is out of range for {}", describe_runtime_type(ty))
}
