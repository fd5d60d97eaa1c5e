//! Construction of the calldata sent during a proxy deployment

use alloy::{
    dyn_abi::{DynSolValue, JsonAbiExt, Specifier},
    json_abi::{Function, JsonAbi},
    primitives::{Address, Bytes},
};
use alloy_sol_types::SolValue;

use crate::errors::ScriptError;

/// Encode a call to the named initializer, coercing each string argument
/// into the type of the corresponding ABI parameter
pub fn initializer_calldata(
    abi: &JsonAbi,
    initializer: &str,
    args: &[String],
) -> Result<Bytes, ScriptError> {
    let function = find_initializer(abi, initializer, args.len())?;

    let values = function
        .inputs
        .iter()
        .zip(args)
        .map(|(param, arg)| {
            let ty = param.resolve().map_err(|e| {
                ScriptError::CalldataConstruction(format!("parameter `{}`: {}", param.name, e))
            })?;
            ty.coerce_str(arg).map_err(|e| {
                ScriptError::CalldataConstruction(format!(
                    "argument `{}` for parameter `{}` of type {}: {}",
                    arg, param.name, param.ty, e
                ))
            })
        })
        .collect::<Result<Vec<DynSolValue>, _>>()?;

    let calldata = function
        .abi_encode_input(&values)
        .map_err(|e| ScriptError::CalldataConstruction(e.to_string()))?;

    Ok(calldata.into())
}

/// Pick the overload of the initializer that takes `num_args` arguments
fn find_initializer<'a>(
    abi: &'a JsonAbi,
    initializer: &str,
    num_args: usize,
) -> Result<&'a Function, ScriptError> {
    let overloads = abi.function(initializer).ok_or_else(|| {
        ScriptError::CalldataConstruction(format!(
            "the contract has no `{}` function",
            initializer
        ))
    })?;

    overloads
        .iter()
        .find(|f| f.inputs.len() == num_args)
        .ok_or_else(|| {
            let signatures: Vec<String> = overloads.iter().map(|f| f.signature()).collect();
            ScriptError::CalldataConstruction(format!(
                "no `{}` overload takes {} arguments, found: {}",
                initializer,
                num_args,
                signatures.join(", ")
            ))
        })
}

/// ABI-encode the constructor arguments of the `TransparentUpgradeableProxy`:
/// `(address _logic, address initialOwner, bytes _data)`
pub fn proxy_constructor_args(
    implementation: Address,
    proxy_admin_owner: Address,
    init_calldata: Bytes,
) -> Bytes {
    (implementation, proxy_admin_owner, init_calldata)
        .abi_encode_params()
        .into()
}

/// Append ABI-encoded constructor arguments to creation bytecode
pub fn with_constructor_args(bytecode: &Bytes, args: &Bytes) -> Bytes {
    [bytecode.as_ref(), args.as_ref()].concat().into()
}
