//! Common Lua sources for tests.

pub const CLASS_WITH_METHODS: &str = r#"---@class Account
---@field owner string
---@field balance number
local Account = {}

---@param amount number
---@return boolean
function Account:deposit(amount)
  self.balance = self.balance + amount
  return true
end

function Account:report()
  return self.owner
end

---@type Account
local acct = Account
print(acct.owner)
"#;

pub const MODULE_UTIL: &str = r#"local M = {}

---@param s string
---@return string
function M.trim(s)
  return s
end

return M
"#;

pub const MODULE_USER: &str = r#"local util = require("lib.util")
local out = util.trim("  x  ")
print(out)
"#;

pub const GENERIC_FUNCTIONS: &str = r#"---@generic T
---@param list T[]
---@return T
local function first(list)
  return list[1]
end

---@generic K, V
---@param map table<K, V>
---@param key K
---@return V
local function get(map, key)
  return map[key]
end

---@type string[]
local names = {}
local head = first(names)
print(head)
"#;
