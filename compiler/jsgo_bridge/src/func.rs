//! Functions crossing the boundary.
//!
//! A compiled function handed to the host becomes a host function that
//! internalizes its arguments, runs the compiled body and externalizes the
//! results. The wrapper is remembered on the compiled function, so handing
//! the same function out twice gives the host the same object.
//!
//! A host function handed to compiled code becomes a compiled function
//! doing the reverse, invoked synchronously with the receiver bound at
//! conversion time.

use std::rc::Rc;

use jsgo_diagnostic::{bailout, FatalError, ResultExt};

use crate::descriptor::{DescId, FuncSig, Kind};
use crate::error::ConversionError;
use crate::host::{HostFunction, HostValue};
use crate::value::{CompiledFunc, FuncRef, Value};
use crate::wrapper::Wrapper;
use crate::Bridge;

impl Bridge {
    pub(crate) fn externalize_func(
        &self,
        func: &FuncRef,
        sig: &FuncSig,
        wrapper: Option<&Wrapper>,
    ) -> Result<HostValue, FatalError> {
        if let Some(existing) = func.host_wrapper.borrow().upgrade() {
            return Ok(HostValue::Function(existing));
        }

        let bridge = self.clone();
        let owned_sig = sig.clone();
        let target = Rc::clone(func);
        let wrapper = wrapper.cloned();
        let host = Rc::new(HostFunction::new(move |_this, args| {
            let params = bridge.internalize_args(args, &owned_sig)?;
            let results = target.call(&params)?;
            bridge.externalize_results(&results, &owned_sig, wrapper.as_ref())
        }));
        // Weak, so the wrapper's own reference to the function is no cycle.
        *func.host_wrapper.borrow_mut() = Rc::downgrade(&host);
        tracing::trace!(params = sig.params.len(), "host wrapper created");
        Ok(HostValue::Function(host))
    }

    /// Host arguments to compiled parameters. Missing arguments are
    /// `undefined`; trailing arguments of a variadic call are collected
    /// into the last parameter's slice.
    fn internalize_args(&self, args: &[HostValue], sig: &FuncSig) -> Result<Vec<Value>, FatalError> {
        let mut params = Vec::with_capacity(sig.params.len());
        for (i, &param) in sig.params.iter().enumerate() {
            if sig.variadic && i + 1 == sig.params.len() {
                let elem = self.slice_elem(param)?;
                let rest = args
                    .get(i..)
                    .unwrap_or_default()
                    .iter()
                    .map(|arg| self.internalize(arg, elem, None))
                    .collect::<Result<Vec<_>, _>>()?;
                params.push(Value::slice(self.store_from(elem, rest)?));
                break;
            }
            let arg = args.get(i).cloned().unwrap_or(HostValue::Undefined);
            params.push(
                self.internalize(&arg, param, None)
                    .clue(|| format!("internalizing argument {i}"))?,
            );
        }
        Ok(params)
    }

    fn externalize_results(
        &self,
        results: &[Value],
        sig: &FuncSig,
        wrapper: Option<&Wrapper>,
    ) -> Result<HostValue, FatalError> {
        if results.len() != sig.results.len() {
            return Err(bailout(ConversionError::ValueMismatch {
                ty: format!("{} results", sig.results.len()),
                expected: "one value per result",
            }));
        }
        let mut converted = Vec::with_capacity(results.len());
        for (value, &desc) in results.iter().zip(&sig.results) {
            let value = self.table.copy_if_required(value, desc)?;
            converted.push(self.externalize(&value, desc, wrapper)?);
        }
        Ok(match converted.len() {
            0 => HostValue::Undefined,
            1 => converted.swap_remove(0),
            _ => HostValue::array(converted),
        })
    }

    pub(crate) fn internalize_func(
        &self,
        host: &HostValue,
        sig: &FuncSig,
        recv: Option<&HostValue>,
        id: DescId,
    ) -> Result<Value, FatalError> {
        let target = match host {
            HostValue::Undefined | HostValue::Null => return Ok(Value::Func(None)),
            HostValue::Function(func) => Rc::clone(func),
            other => {
                return Err(bailout(ConversionError::UnexpectedHostValue {
                    host: other.type_of(),
                    ty: self.table.string(id),
                }))
            }
        };
        let bridge = self.clone();
        let sig = sig.clone();
        let this = recv.cloned().unwrap_or(HostValue::Undefined);
        Ok(Value::func(CompiledFunc::new(move |args| {
            let host_args = bridge.externalize_args(args, &sig)?;
            let result = target.call(&this, &host_args)?;
            bridge.internalize_results(&result, &sig)
        })))
    }

    /// Compiled arguments to host arguments. A variadic slice is spread.
    fn externalize_args(&self, args: &[Value], sig: &FuncSig) -> Result<Vec<HostValue>, FatalError> {
        let mut host_args = Vec::with_capacity(args.len());
        for (i, &param) in sig.params.iter().enumerate() {
            let arg = args.get(i).ok_or_else(|| self.mismatch(param, "argument"))?;
            if sig.variadic && i + 1 == sig.params.len() {
                let elem = self.slice_elem(param)?;
                match arg {
                    Value::Slice(Some(rest)) => {
                        for item in rest.to_vec() {
                            host_args.push(self.externalize(&item, elem, None)?);
                        }
                    }
                    Value::Slice(None) => {}
                    _ => return Err(self.mismatch(param, "variadic slice")),
                }
                break;
            }
            host_args.push(
                self.externalize(arg, param, None)
                    .clue(|| format!("externalizing argument {i}"))?,
            );
        }
        Ok(host_args)
    }

    /// A host return value to the compiled results: nothing, one value, or
    /// one per element of a returned array.
    fn internalize_results(&self, result: &HostValue, sig: &FuncSig) -> Result<Vec<Value>, FatalError> {
        match sig.results.as_slice() {
            [] => Ok(Vec::new()),
            [only] => Ok(vec![self.internalize(result, *only, None)?]),
            many => many
                .iter()
                .enumerate()
                .map(|(i, &desc)| self.internalize(&result.get(&i.to_string()), desc, None))
                .collect(),
        }
    }

    fn slice_elem(&self, id: DescId) -> Result<DescId, FatalError> {
        match self.table.desc(id)?.kind {
            Kind::Slice { elem } => Ok(elem),
            _ => Err(self.mismatch(id, "variadic slice")),
        }
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
