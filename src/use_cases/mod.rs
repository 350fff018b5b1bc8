pub mod authorize;
pub mod facebook_authentication;

#[cfg(test)]
pub(crate) mod test_support;
