/*!

This is the long-form manual for `vote_store` and `voterec`.

## The store file

Votes are kept in a single CSV file (UTF-8, comma separated, one record per line):

```text
NUID,Candidate
12345678,Will
87654321,Max
11223344,"Smith, Jane"
```

- The first line is a header naming the two columns. It is written once, when
  the file is created, and is never read back as a vote. The names can be changed
  with [`crate::StoreHeader`].
- Every other line is a vote: an 8-digit identifier, then the candidate. Candidates
  are free text; fields containing a comma, a quote or a line break are quoted
  following the usual CSV rules.
- Lines are only ever appended. Nothing in this crate rewrites or removes a line.

If the program is interrupted while appending, the file may end with an incomplete
line. Such a line is ignored when listing records, but its first field still takes
part in the duplicate check.

## Taking a vote

A vote is accepted in three steps, in this order:

1. the identifier must be exactly 8 ASCII digits ([`crate::is_valid_identifier`]);
2. the identifier must not already appear in the file ([`crate::VoteStore::has_voted`]);
3. the record is appended ([`crate::VoteStore::record`]).

[`crate::VoteLedger::submit`] runs all of them. Calling `record` directly skips the
checks and can write a second vote for the same identifier.

Only one process should write to a given file at a time: there is no locking.

## Linear scan or index

[`crate::VoteStore`] reads the whole file for every duplicate check. This is fine
for the few thousand votes of a classroom or club election. [`crate::IndexedVoteStore`]
reads the file once when it is opened and then answers from memory.

## `voterec`

The command line program is the front-end of the store.

```bash
# Create election.csv with its header
voterec init

# Vote for one of the listed candidates
voterec vote --id 12345678 --candidate Will

# Vote for someone else
voterec vote --id 87654321 --write-in "Jane Smith"

# Has this identifier voted?
voterec check --id 12345678
```

Global options (accepted before or after the command):
- `--store <path>`: the store file (default `election.csv`)
- `--config <path>`: a JSON configuration file (see below)
- `--verbose`: debug logging. Otherwise the `RUST_LOG` variable is used.

The exit status is `0` when the vote is recorded, `2` when the identifier has
already voted, and `1` for any other error (bad identifier, missing candidate,
unreadable store).

### Configuration file

```json
{
    "storePath": "election.csv",
    "header": { "identifier": "NUID", "candidate": "Candidate" },
    "candidates": ["Will", "Max"],
    "allowWriteIn": true,
    "indexed": false
}
```

All the fields are optional. A relative `storePath` is resolved against the
directory of the configuration file. `--store` on the command line takes
precedence over `storePath`.

*/
